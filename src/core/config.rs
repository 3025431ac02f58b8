//! Run configuration with documented constants
//!
//! Both values are fixed for the duration of a run. They are passed into
//! feature construction and the simulator explicitly, so two runs with
//! different settings can exist side by side.

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, SprintError};

/// Default number of working slots in one day
pub const DEFAULT_TICKS_PER_DAY: u32 = 8;

/// Default review effort as a fraction of development effort
pub const DEFAULT_REVIEW_COEFFICIENT: f64 = 0.2;

/// Configuration for a single simulation run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of ticks in one working day
    ///
    /// Daily productivity is divided by this value to get per-tick effort.
    /// At the default of 8, a worker with productivity 8.0 contributes 1.0
    /// effort unit per tick.
    pub ticks_per_day: u32,

    /// Multiplier used to derive review effort from development effort
    ///
    /// Features with a Development stage and no explicit Review stage get a
    /// Review stage of `round(development * review_coefficient, 2)`.
    pub review_coefficient: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ticks_per_day: DEFAULT_TICKS_PER_DAY,
            review_coefficient: DEFAULT_REVIEW_COEFFICIENT,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ticks_per_day(mut self, ticks_per_day: u32) -> Self {
        self.ticks_per_day = ticks_per_day;
        self
    }

    pub fn with_review_coefficient(mut self, review_coefficient: f64) -> Self {
        self.review_coefficient = review_coefficient;
        self
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.ticks_per_day == 0 {
            return Err(SprintError::Config("ticks_per_day must be at least 1".into()));
        }

        if !self.review_coefficient.is_finite() || self.review_coefficient < 0.0 {
            return Err(SprintError::Config(format!(
                "review_coefficient must be a non-negative number, got {}",
                self.review_coefficient
            )));
        }

        Ok(())
    }
}
