//! Delivery stages in pipeline order

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::SprintError;

static PIPELINE: [Stage; 4] = Stage::ALL;

/// One phase of a feature's delivery pipeline.
///
/// Variant order is pipeline order; `Ord` relies on it. Review always sits
/// between Development and Testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Analytics,
    Development,
    #[serde(alias = "code_review")]
    Review,
    Testing,
}

impl Stage {
    /// All stages in pipeline order
    pub const ALL: [Stage; 4] = [
        Stage::Analytics,
        Stage::Development,
        Stage::Review,
        Stage::Testing,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Stage::Analytics => "Analytics",
            Stage::Development => "Development",
            Stage::Review => "Code Review",
            Stage::Testing => "Testing",
        }
    }

    /// Position in the pipeline, starting at 0
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Stages that come after this one, in order
    pub fn following(&self) -> &'static [Stage] {
        &PIPELINE[self.index() + 1..]
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Stage {
    type Err = SprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "analytics" => Ok(Stage::Analytics),
            "development" => Ok(Stage::Development),
            "review" | "code_review" => Ok(Stage::Review),
            "testing" => Ok(Stage::Testing),
            _ => Err(SprintError::UnknownStage(s.to_string())),
        }
    }
}
