//! Row-level feedback on a comparison table.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Direction of a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vote {
    Up,
    Down,
}

/// Feedback state of one row. At most one flag is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowVote {
    #[serde(default)]
    pub up: bool,
    #[serde(default)]
    pub down: bool,
}

impl RowVote {
    /// Applies a vote: the chosen flag toggles and the opposite one clears.
    pub fn apply(self, vote: Vote) -> Self {
        match vote {
            Vote::Up => Self {
                up: !self.up,
                down: false,
            },
            Vote::Down => Self {
                up: false,
                down: !self.down,
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.up && !self.down
    }
}

/// Feedback for one result, keyed by row index.
pub type RowFeedback = BTreeMap<usize, RowVote>;
