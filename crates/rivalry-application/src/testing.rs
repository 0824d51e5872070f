//! Fixtures and hand-written service doubles shared by the unit tests.

use async_trait::async_trait;
use rivalry_core::analysis::AnalysisResult;
use rivalry_core::comparison::{ComparisonRecord, ComparisonService, RawComparison};
use rivalry_core::error::{Result, RivalryError};
use rivalry_core::extraction::{Extraction, extract_record};
use rivalry_core::persona::{PersonaAnalysisService, PersonaVerdict};
use serde_json::json;
use std::sync::Mutex;
use std::time::Duration;

pub const PERSONA_IDS: [&str; 4] = ["student", "athlete", "budget", "gourmet"];

/// A valid record comparing the sides of `query` ("A vs B").
pub fn record_json(query: &str, suggested: &str) -> String {
    let names: Vec<&str> = query.split(" vs ").collect();
    let cells = vec!["$"; names.len()];
    let scores = vec![5.0; names.len()];
    json!({
        "items": names.iter().map(|n| json!({"name": n})).collect::<Vec<_>>(),
        "summary": format!("{} compared", query),
        "verdict": "It depends",
        "rivalryScore": 70,
        "rivalryText": "Close",
        "rows": [{"feature": "Price", "values": cells, "winnerIndex": 0}],
        "radarScores": [{"attribute": "Value", "scores": scores}],
        "personas": PERSONA_IDS
            .iter()
            .map(|id| json!({"id": id, "label": id.to_uppercase()}))
            .collect::<Vec<_>>(),
        "suggestedPersonaId": suggested,
    })
    .to_string()
}

pub fn record(query: &str) -> ComparisonRecord {
    serde_json::from_str(&record_json(query, "student")).unwrap()
}

pub fn structured_result(query: &str, timestamp: i64) -> AnalysisResult {
    let extraction = extract_record(&record_json(query, "student"));
    assert!(extraction.record.is_some());
    AnalysisResult::new(query, extraction, Vec::new(), timestamp)
}

pub fn result_with_suggestion(query: &str, suggested: &str) -> AnalysisResult {
    let extraction = extract_record(&record_json(query, suggested));
    AnalysisResult::new(query, extraction, Vec::new(), 1)
}

pub fn unstructured_result(query: &str, timestamp: i64) -> AnalysisResult {
    AnalysisResult::new(query, Extraction::unstructured("no json"), Vec::new(), timestamp)
}

/// Comparison service that answers with a valid record wrapped in prose.
///
/// Queries listed in `delays` are answered after the given pause; queries in
/// `failing` fail.
#[derive(Default)]
pub struct MockComparisonService {
    pub calls: Mutex<Vec<String>>,
    pub delays: Vec<(String, Duration)>,
    pub failing: Vec<String>,
}

impl MockComparisonService {
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ComparisonService for MockComparisonService {
    async fn compare(&self, query: &str) -> Result<RawComparison> {
        self.calls.lock().unwrap().push(query.to_string());

        if let Some((_, delay)) = self.delays.iter().find(|(q, _)| q == query) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.iter().any(|q| q == query) {
            return Err(RivalryError::service("upstream exploded", true));
        }

        Ok(RawComparison::new(format!(
            "Sure! {}\nHope that helps.",
            record_json(query, "student")
        ))
        .with_grounding(json!({
            "groundingChunks": [{"web": {"uri": "https://example.com", "title": "Example"}}]
        })))
    }
}

/// Persona service answering "<label> pick" for the first item.
#[derive(Default)]
pub struct MockPersonaService {
    pub calls: Mutex<Vec<String>>,
    pub delays: Vec<(String, Duration)>,
    pub failing: Vec<String>,
}

impl MockPersonaService {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PersonaAnalysisService for MockPersonaService {
    async fn analyze_persona(
        &self,
        record: &ComparisonRecord,
        persona_label: &str,
    ) -> Result<PersonaVerdict> {
        self.calls.lock().unwrap().push(persona_label.to_string());

        if let Some((_, delay)) = self.delays.iter().find(|(l, _)| l == persona_label) {
            tokio::time::sleep(*delay).await;
        }
        if self.failing.iter().any(|l| l == persona_label) {
            return Err(RivalryError::service("persona analysis failed", false));
        }

        Ok(PersonaVerdict {
            winner: record.items[0].name.clone(),
            reason: format!("{} pick", persona_label),
        })
    }
}
