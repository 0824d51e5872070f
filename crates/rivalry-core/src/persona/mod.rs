//! Persona domain module.
//!
//! A persona is a user-profile lens ("budget-conscious", "gamer") that
//! re-ranks which compared item wins.
//!
//! # Module Structure
//!
//! - `model`: `Persona` and the `PersonaVerdict` an analysis produces
//! - `service`: `PersonaAnalysisService`, the external analysis request

mod model;
mod service;

pub use model::{Persona, PersonaVerdict};
pub use service::PersonaAnalysisService;
