use anyhow::{Result, anyhow, bail};
use rivalry_core::analysis::SavedComparison;
use rivalry_core::feedback::Vote;

use super::{AppContext, render};

fn find(ctx: &AppContext, id: &str) -> Result<SavedComparison> {
    ctx.bookmarks
        .find(id)
        .ok_or_else(|| anyhow!("No saved comparison with id {}", id))
}

pub fn list(ctx: &AppContext) {
    let saved = ctx.bookmarks.list();
    if saved.is_empty() {
        println!("Nothing saved.");
        return;
    }
    for entry in saved {
        println!("{}  {}", entry.id, entry.result.query);
    }
}

pub fn show(ctx: &AppContext, id: &str) -> Result<()> {
    let saved = find(ctx, id)?;
    render::result(&saved.result);

    let feedback = ctx.feedback.get(&saved.result);
    if !feedback.is_empty() {
        println!("\nYour votes:");
        for (row, vote) in feedback {
            println!("  row {}: {}", row, if vote.up { "up" } else { "down" });
        }
    }
    Ok(())
}

pub fn remove(ctx: &AppContext, id: &str) -> Result<()> {
    if !ctx.bookmarks.remove(id) {
        bail!("No saved comparison with id {}", id);
    }
    println!("Removed {}.", id);
    Ok(())
}

pub fn feedback(ctx: &AppContext, id: &str, row: usize, vote: Vote) -> Result<()> {
    let saved = find(ctx, id)?;
    let rows = saved.result.record.as_ref().map_or(0, |r| r.rows.len());
    if row >= rows {
        bail!("Row {} does not exist (comparison has {} rows)", row, rows);
    }

    let state = ctx.feedback.vote(&saved.result, row, vote);
    let label = match (state.up, state.down) {
        (true, _) => "up",
        (_, true) => "down",
        _ => "cleared",
    };
    println!("Row {}: {}", row, label);
    Ok(())
}
