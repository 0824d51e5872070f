//! Remote language-model adapters.
//!
//! The application layer only sees [`ComparisonService`] and
//! [`PersonaAnalysisService`]; this crate provides the Gemini-backed
//! implementation of both.
//!
//! [`ComparisonService`]: rivalry_core::comparison::ComparisonService
//! [`PersonaAnalysisService`]: rivalry_core::persona::PersonaAnalysisService

pub mod gemini;

pub use gemini::GeminiClient;
