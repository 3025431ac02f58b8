//! Review outcome policies
//!
//! Consulted when a feature finishes its Review stage. The default approves
//! everything, which keeps stage order strictly forward. `RandomRejection`
//! opts into a rework loop that can send features back to Development.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::sprint::feature::Feature;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReviewOutcome {
    /// Continue to the next stage
    Approve,
    /// Return to Development with `fraction` of the original development
    /// effort outstanding
    Rework { fraction: f64 },
}

pub trait ReviewPolicy {
    fn review(&mut self, feature: &Feature) -> ReviewOutcome;
}

/// Every review passes
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproveAll;

impl ReviewPolicy for ApproveAll {
    fn review(&mut self, _feature: &Feature) -> ReviewOutcome {
        ReviewOutcome::Approve
    }
}

/// Rejects a review with fixed probability, using a seeded RNG so runs are
/// reproducible.
#[derive(Debug, Clone)]
pub struct RandomRejection {
    fail_probability: f64,
    rework_fraction: f64,
    rng: ChaCha8Rng,
}

impl RandomRejection {
    pub fn new(fail_probability: f64, rework_fraction: f64, seed: u64) -> Self {
        let fail_probability = if fail_probability.is_nan() {
            0.0
        } else {
            fail_probability
        };
        Self {
            fail_probability: fail_probability.clamp(0.0, 1.0),
            rework_fraction: rework_fraction.clamp(0.0, 1.0),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn fail_probability(&self) -> f64 {
        self.fail_probability
    }

    pub fn rework_fraction(&self) -> f64 {
        self.rework_fraction
    }
}

impl ReviewPolicy for RandomRejection {
    fn review(&mut self, feature: &Feature) -> ReviewOutcome {
        if self.rng.gen_bool(self.fail_probability) {
            tracing::debug!("Review failed for {}", feature.name());
            ReviewOutcome::Rework {
                fraction: self.rework_fraction,
            }
        } else {
            tracing::debug!("Review passed for {}", feature.name());
            ReviewOutcome::Approve
        }
    }
}
