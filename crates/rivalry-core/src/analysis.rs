//! Completed search results and their saved form.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::comparison::ComparisonRecord;
use crate::extraction::Extraction;

/// A web citation attached to a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub uri: String,
}

/// Logical identity of an [`AnalysisResult`].
///
/// Results created by this engine carry an explicit session id. Results
/// persisted before ids existed are identified by their `(query, timestamp)`
/// pair instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResultIdentity {
    Session(String),
    Legacy { query: String, timestamp: i64 },
}

impl ResultIdentity {
    /// Suffix used to namespace per-result store keys.
    pub fn storage_suffix(&self) -> String {
        match self {
            Self::Session(id) => id.clone(),
            Self::Legacy { timestamp, .. } => timestamp.to_string(),
        }
    }
}

/// The outcome of one completed search.
///
/// Immutable once created; the session replaces its "current" result
/// wholesale instead of editing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Session identifier (UUID v4). Empty for results saved by older builds.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub record: Option<ComparisonRecord>,
    #[serde(default)]
    pub sources: Vec<Source>,
    /// The model's text, kept only when no record could be extracted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,
    pub query: String,
    /// Creation time, milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl AnalysisResult {
    /// Creates a result with a fresh session id.
    pub fn new(
        query: impl Into<String>,
        extraction: Extraction,
        sources: Vec<Source>,
        timestamp: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            record: extraction.record,
            sources,
            raw_text: extraction.raw_text,
            query: query.into(),
            timestamp,
        }
    }

    pub fn identity(&self) -> ResultIdentity {
        if self.id.is_empty() {
            ResultIdentity::Legacy {
                query: self.query.clone(),
                timestamp: self.timestamp,
            }
        } else {
            ResultIdentity::Session(self.id.clone())
        }
    }

    /// Whether both results denote the same completed search.
    pub fn same_search(&self, other: &AnalysisResult) -> bool {
        self.identity() == other.identity()
    }

    pub fn is_structured(&self) -> bool {
        self.record.is_some()
    }
}

/// A bookmarked result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedComparison {
    /// Generated bookmark id, used for list-view deletion only.
    pub id: String,
    /// When the bookmark was created, milliseconds since the Unix epoch.
    pub saved_at: i64,
    pub result: AnalysisResult,
}

impl SavedComparison {
    pub fn new(result: AnalysisResult, saved_at: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            saved_at,
            result,
        }
    }
}
