//! Work assignment strategies
//!
//! A strategy picks at most one feature for a worker from the active list.
//! Strategies are stateless and must not mutate anything: the simulator
//! applies the work afterwards.

use std::str::FromStr;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::error::SprintError;
use crate::sprint::feature::Feature;
use crate::sprint::worker::Worker;

pub trait AssignmentStrategy {
    /// Index into `features` of the feature `worker` should work on, if any
    fn choose_feature(&self, worker: &Worker, features: &[Feature]) -> Option<usize>;

    fn name(&self) -> &'static str;
}

/// Greedy first match in declared feature order
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstMatchStrategy;

impl AssignmentStrategy for FirstMatchStrategy {
    fn choose_feature(&self, worker: &Worker, features: &[Feature]) -> Option<usize> {
        features
            .iter()
            .position(|feature| feature.can_be_worked_by(worker))
    }

    fn name(&self) -> &'static str {
        "first-match"
    }
}

/// Eligible feature with the least total remaining effort; ties go to the
/// earlier feature in declared order.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeastRemainingStrategy;

impl AssignmentStrategy for LeastRemainingStrategy {
    fn choose_feature(&self, worker: &Worker, features: &[Feature]) -> Option<usize> {
        features
            .iter()
            .enumerate()
            .filter(|(_, feature)| feature.can_be_worked_by(worker))
            .min_by_key(|(_, feature)| OrderedFloat(feature.total_remaining()))
            .map(|(idx, _)| idx)
    }

    fn name(&self) -> &'static str {
        "least-remaining"
    }
}

/// Strategy selector for plan files and the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyKind {
    #[default]
    #[serde(alias = "simple")]
    FirstMatch,
    #[serde(alias = "priority")]
    LeastRemaining,
}

impl StrategyKind {
    pub fn build(&self) -> Box<dyn AssignmentStrategy> {
        match self {
            StrategyKind::FirstMatch => Box::new(FirstMatchStrategy),
            StrategyKind::LeastRemaining => Box::new(LeastRemainingStrategy),
        }
    }
}

impl FromStr for StrategyKind {
    type Err = SprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first-match" | "first_match" | "simple" => Ok(StrategyKind::FirstMatch),
            "least-remaining" | "least_remaining" | "priority" => {
                Ok(StrategyKind::LeastRemaining)
            }
            other => Err(SprintError::Config(format!(
                "unknown assignment strategy: {}",
                other
            ))),
        }
    }
}
