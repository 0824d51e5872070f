//! Comparison records and the service that produces them.
//!
//! - `model`: the structured record (`ComparisonRecord`) and its invariants
//! - `service`: the external comparison request (`ComparisonService`)

pub mod model;
pub mod service;

pub use model::{
    ComparisonRecord, ComparisonRow, Item, NO_WINNER, PERSONA_COUNT, RadarScore, RecordViolation,
    TREND_POINTS, TrendPoint,
};
pub use service::{ComparisonService, RawComparison};
