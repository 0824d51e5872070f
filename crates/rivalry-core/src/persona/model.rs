//! Persona domain model.

use serde::{Deserialize, Serialize};

/// A persona offered by a comparison record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Persona {
    /// Identifier unique within one record
    pub id: String,
    /// Display label, also sent to the analysis request
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Which item wins for a given persona, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaVerdict {
    pub winner: String,
    pub reason: String,
}
