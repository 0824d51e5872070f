use anyhow::{Result, bail};
use rivalry_application::SessionState;

use super::{AppContext, Session, render};

/// `rivalry compare <query>`
pub async fn run(ctx: &AppContext, query: &str, save: bool, persona: Option<&str>) -> Result<()> {
    if query.trim().is_empty() {
        bail!("Query is empty");
    }

    let share = ctx.share_link(&ctx.config.share.base_url)?;
    let session = ctx.session(share)?;
    let state = session.coordinator.search(query).await;
    finish(&session, state, save, persona).await
}

/// `rivalry open <url>`
pub async fn open(ctx: &AppContext, url: &str) -> Result<()> {
    let share = ctx.share_link(url)?;
    let session = ctx.session(share)?;
    match session.coordinator.load_deep_link().await {
        Some(state) => finish(&session, state, false, None).await,
        None => bail!("Link has no '{}' parameter", ctx.config.share.param),
    }
}

async fn finish(
    session: &Session,
    state: SessionState,
    save: bool,
    persona: Option<&str>,
) -> Result<()> {
    let result = match state {
        SessionState::Success(result) => result,
        SessionState::Error { message, .. } => bail!(message),
        SessionState::Idle | SessionState::Loading { .. } => bail!("No comparison was produced"),
    };

    session.coordinator.settle_personas().await;

    if let (Some(persona_id), Some(record)) = (persona, result.record.as_ref()) {
        match record.persona(persona_id) {
            Some(p) => session.personas.select(&p.id, &p.label).await,
            None => tracing::warn!("[CLI] Persona '{}' is not offered for this comparison", persona_id),
        }
    }

    render::result(&result);
    render::persona(&session.personas.snapshot().await);

    if save && !session.coordinator.is_current_saved().await {
        session.coordinator.toggle_bookmark().await;
        println!("\nSaved.");
    }
    if let Some(url) = session.coordinator.share_url().await {
        println!("\nShare: {}", url);
    }
    Ok(())
}
