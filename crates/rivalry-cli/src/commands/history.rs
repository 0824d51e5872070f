use chrono::{Local, TimeZone};

use super::AppContext;

fn format_timestamp(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(time) => time.format("%Y-%m-%d %H:%M").to_string(),
        None => millis.to_string(),
    }
}

pub fn list(ctx: &AppContext) {
    let entries = ctx.history.entries();
    if entries.is_empty() {
        println!("No searches yet.");
        return;
    }
    for entry in entries {
        println!("{}  {}", format_timestamp(entry.timestamp), entry.query);
    }
}

pub fn remove(ctx: &AppContext, query: &str) {
    if ctx.history.remove(query) {
        println!("Removed '{}'.", query);
    } else {
        println!("'{}' is not in the history.", query);
    }
}

pub fn clear(ctx: &AppContext) {
    ctx.history.clear();
    println!("History cleared.");
}

pub fn trends(ctx: &AppContext) {
    let summary = ctx.history.trend_summary(ctx.clock.now_millis());
    println!(
        "Today:     {:>3} searches ({} vs previous day)",
        summary.day.current,
        summary.day.trend_label()
    );
    println!(
        "This week: {:>3} searches ({} vs previous week)",
        summary.week.current,
        summary.week.trend_label()
    );
}
