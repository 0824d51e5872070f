//! Comparison domain models.
//!
//! These types mirror the JSON object the model is asked to produce, so field
//! names are camelCase on the wire.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::persona::Persona;

/// Number of personas every comparison must offer.
pub const PERSONA_COUNT: usize = 4;

/// Number of points in a search-interest trend series.
pub const TREND_POINTS: usize = 6;

/// `winnerIndex` value meaning "tie / no winner".
pub const NO_WINNER: i32 = -1;

/// One of the things being compared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A single feature row of the comparison table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRow {
    pub feature: String,
    /// One cell per item, in item order.
    pub values: Vec<String>,
    /// Index into `items`, or [`NO_WINNER`].
    pub winner_index: i32,
}

impl ComparisonRow {
    /// Returns the winning item index, `None` for a tie.
    pub fn winner(&self) -> Option<usize> {
        usize::try_from(self.winner_index).ok()
    }
}

/// A radar-chart axis with one score per item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RadarScore {
    pub attribute: String,
    pub scores: Vec<f64>,
}

/// One point of the relative search-interest series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub label: String,
    pub values: Vec<f64>,
}

/// The structured comparison the model returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRecord {
    pub items: Vec<Item>,
    pub summary: String,
    pub verdict: String,
    /// How fierce the rivalry is, 0..=100.
    pub rivalry_score: i64,
    pub rivalry_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_trend: Option<Vec<TrendPoint>>,
    pub rows: Vec<ComparisonRow>,
    #[serde(default)]
    pub radar_scores: Vec<RadarScore>,
    pub personas: Vec<Persona>,
    pub suggested_persona_id: String,
}

/// The first invariant a [`ComparisonRecord`] breaks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordViolation {
    TooFewItems(usize),
    RivalryScoreOutOfRange(i64),
    RowArity {
        row: usize,
        expected: usize,
        actual: usize,
    },
    WinnerOutOfRange {
        row: usize,
        winner_index: i32,
    },
    RadarArity {
        attribute: String,
        expected: usize,
        actual: usize,
    },
    TrendLength(usize),
    TrendArity {
        point: usize,
        expected: usize,
        actual: usize,
    },
    PersonaCount(usize),
    UnknownSuggestedPersona(String),
}

impl fmt::Display for RecordViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewItems(n) => write!(f, "expected at least 2 items, got {}", n),
            Self::RivalryScoreOutOfRange(s) => write!(f, "rivalryScore {} outside 0..=100", s),
            Self::RowArity {
                row,
                expected,
                actual,
            } => write!(f, "row {} has {} values, expected {}", row, actual, expected),
            Self::WinnerOutOfRange { row, winner_index } => {
                write!(f, "row {} has winnerIndex {}", row, winner_index)
            }
            Self::RadarArity {
                attribute,
                expected,
                actual,
            } => write!(
                f,
                "radar axis '{}' has {} scores, expected {}",
                attribute, actual, expected
            ),
            Self::TrendLength(n) => {
                write!(f, "searchTrend has {} points, expected {}", n, TREND_POINTS)
            }
            Self::TrendArity {
                point,
                expected,
                actual,
            } => write!(
                f,
                "searchTrend point {} has {} values, expected {}",
                point, actual, expected
            ),
            Self::PersonaCount(n) => write!(f, "expected {} personas, got {}", PERSONA_COUNT, n),
            Self::UnknownSuggestedPersona(id) => {
                write!(f, "suggestedPersonaId '{}' matches no persona", id)
            }
        }
    }
}

impl std::error::Error for RecordViolation {}

impl ComparisonRecord {
    /// Checks the structural invariants the rest of the engine relies on.
    pub fn validate(&self) -> Result<(), RecordViolation> {
        let arity = self.items.len();
        if arity < 2 {
            return Err(RecordViolation::TooFewItems(arity));
        }
        if !(0..=100).contains(&self.rivalry_score) {
            return Err(RecordViolation::RivalryScoreOutOfRange(self.rivalry_score));
        }

        for (index, row) in self.rows.iter().enumerate() {
            if row.values.len() != arity {
                return Err(RecordViolation::RowArity {
                    row: index,
                    expected: arity,
                    actual: row.values.len(),
                });
            }
            let in_range = row.winner_index == NO_WINNER
                || (row.winner_index >= 0 && (row.winner_index as usize) < arity);
            if !in_range {
                return Err(RecordViolation::WinnerOutOfRange {
                    row: index,
                    winner_index: row.winner_index,
                });
            }
        }

        for radar in &self.radar_scores {
            if radar.scores.len() != arity {
                return Err(RecordViolation::RadarArity {
                    attribute: radar.attribute.clone(),
                    expected: arity,
                    actual: radar.scores.len(),
                });
            }
        }

        if let Some(trend) = &self.search_trend {
            if trend.len() != TREND_POINTS {
                return Err(RecordViolation::TrendLength(trend.len()));
            }
            for (index, point) in trend.iter().enumerate() {
                if point.values.len() != arity {
                    return Err(RecordViolation::TrendArity {
                        point: index,
                        expected: arity,
                        actual: point.values.len(),
                    });
                }
            }
        }

        if self.personas.len() != PERSONA_COUNT {
            return Err(RecordViolation::PersonaCount(self.personas.len()));
        }
        if self.persona(&self.suggested_persona_id).is_none() {
            return Err(RecordViolation::UnknownSuggestedPersona(
                self.suggested_persona_id.clone(),
            ));
        }

        Ok(())
    }

    /// Looks up a persona offered by this record.
    pub fn persona(&self, persona_id: &str) -> Option<&Persona> {
        self.personas.iter().find(|p| p.id == persona_id)
    }

    /// Item names joined the way a headline reads ("A vs B vs C").
    pub fn title(&self) -> String {
        self.items
            .iter()
            .map(|item| item.name.as_str())
            .collect::<Vec<_>>()
            .join(" vs ")
    }
}
