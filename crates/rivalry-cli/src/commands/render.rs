//! Plain-text rendering of results.

use rivalry_application::{PersonaSnapshot, PersonaState};
use rivalry_core::analysis::AnalysisResult;
use rivalry_core::comparison::ComparisonRecord;

pub fn result(result: &AnalysisResult) {
    match &result.record {
        Some(record) => structured(record),
        None => println!("{}", result.raw_text.as_deref().unwrap_or_default()),
    }

    if !result.sources.is_empty() {
        println!("\nSources:");
        for source in &result.sources {
            println!("  - {} <{}>", source.title, source.uri);
        }
    }
}

fn structured(record: &ComparisonRecord) {
    println!("{}", record.title());
    println!("Rivalry {}/100: {}\n", record.rivalry_score, record.rivalry_text);
    println!("{}\n", record.summary);

    for (index, row) in record.rows.iter().enumerate() {
        let winner = row
            .winner()
            .and_then(|i| record.items.get(i))
            .map_or("tie", |item| item.name.as_str());
        println!("[{}] {}: {} (winner: {})", index, row.feature, row.values.join(" | "), winner);
    }

    println!("\nVerdict: {}", record.verdict);

    let personas: Vec<_> = record
        .personas
        .iter()
        .map(|p| format!("{} ({})", p.label, p.id))
        .collect();
    println!("Personas: {}", personas.join(", "));
}

pub fn persona(snapshot: &PersonaSnapshot) {
    let Some(id) = &snapshot.selected_persona_id else {
        return;
    };
    match &snapshot.state {
        PersonaState::Ready(verdict) => {
            println!("\nFor {}: {} wins. {}", id, verdict.winner, verdict.reason)
        }
        PersonaState::Failed => println!("\nFor {}: analysis unavailable", id),
        PersonaState::Loading | PersonaState::NotSelected => {}
    }
}
