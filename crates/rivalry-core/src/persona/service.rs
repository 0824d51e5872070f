//! Persona analysis service trait definition.

use async_trait::async_trait;

use crate::comparison::ComparisonRecord;
use crate::error::Result;
use crate::persona::PersonaVerdict;

/// The external persona-targeted analysis request.
#[async_trait]
pub trait PersonaAnalysisService: Send + Sync {
    /// Re-judges `record` from the point of view of `persona_label`.
    async fn analyze_persona(
        &self,
        record: &ComparisonRecord,
        persona_label: &str,
    ) -> Result<PersonaVerdict>;
}
