//! Comparison service trait definition.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// What the model service hands back for one comparison request.
#[derive(Debug, Clone, Default)]
pub struct RawComparison {
    /// Free text that usually, but not always, embeds one JSON object.
    pub text: String,
    /// Side-channel citation metadata (`groundingMetadata`), when present.
    pub grounding: Option<Value>,
}

impl RawComparison {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            grounding: None,
        }
    }

    pub fn with_grounding(mut self, grounding: Value) -> Self {
        self.grounding = Some(grounding);
        self
    }
}

/// The external comparison request.
///
/// Implementations may fail for any transport or model reason; the session
/// coordinator maps every failure to a generic error state.
#[async_trait]
pub trait ComparisonService: Send + Sync {
    /// Asks the model to compare the items named in `query`.
    async fn compare(&self, query: &str) -> Result<RawComparison>;
}
