//! Core type definitions used throughout the codebase

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Stable identity of a worker within one run.
///
/// Features refer to workers only through this id, never by holding worker
/// state. Names double as ids, so two workers sharing a name are treated as
/// the same person for assignment and review eligibility.
#[derive(
    Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct WorkerId(String);

impl WorkerId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WorkerId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for WorkerId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Effort in abstract units (hours in the default configuration)
pub type Effort = f64;

/// Round an effort value to two decimal places.
///
/// Goes through decimal formatting so halfway cases resolve on the exact
/// binary value. `(x * 100.0).round() / 100.0` disagrees on inputs like 2.675.
pub fn round_effort(value: Effort) -> Effort {
    format!("{:.2}", value).parse().unwrap_or(value)
}
