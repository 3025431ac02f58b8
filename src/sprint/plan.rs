//! Sprint plans loaded from TOML
//!
//! A plan names the team, the features with their stage efforts and
//! assignees, and the run settings. Workers and features keep file order,
//! which is also their processing order in the simulator.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SprintError};
use crate::core::types::WorkerId;
use crate::sprint::feature::Feature;
use crate::sprint::review::{RandomRejection, ReviewPolicy};
use crate::sprint::simulator::Simulator;
use crate::sprint::stage::Stage;
use crate::sprint::strategy::StrategyKind;
use crate::sprint::worker::{Role, Worker};

fn default_max_days() -> u32 {
    10
}

fn default_true() -> bool {
    true
}

fn default_rework_fraction() -> f64 {
    0.5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SprintPlan {
    #[serde(default = "default_max_days")]
    pub max_days: u32,
    #[serde(default)]
    pub strategy: StrategyKind,
    #[serde(default = "default_true")]
    pub validate: bool,
    #[serde(default)]
    pub config: SimulationConfig,
    /// Opt-in review rework loop; absent means every review passes
    #[serde(default)]
    pub review: Option<ReviewSettings>,
    #[serde(default)]
    pub workers: Vec<WorkerPlan>,
    #[serde(default)]
    pub features: Vec<FeaturePlan>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewSettings {
    pub fail_probability: f64,
    #[serde(default = "default_rework_fraction")]
    pub rework_fraction: f64,
    #[serde(default)]
    pub seed: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerPlan {
    pub name: String,
    pub role: Role,
    pub productivity_per_day: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeaturePlan {
    pub name: String,
    /// Stage name to effort; parsed with `Stage::from_str`
    pub stages: BTreeMap<String, f64>,
    pub initial_stage: String,
    #[serde(default)]
    pub assignees: Vec<String>,
    pub review_coefficient: Option<f64>,
}

impl SprintPlan {
    /// Load a plan from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse a plan from TOML string
    pub fn parse_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Construct workers and features in file order
    pub fn build(&self) -> Result<(Vec<Worker>, Vec<Feature>)> {
        self.config.validate()?;

        let workers: Vec<Worker> = self
            .workers
            .iter()
            .map(|w| Worker::new(w.name.clone(), w.role, w.productivity_per_day))
            .collect();

        let features = self
            .features
            .iter()
            .map(|plan| plan.build(&workers, &self.config))
            .collect::<Result<Vec<_>>>()?;

        Ok((workers, features))
    }

    pub fn review_policy(&self) -> Option<Box<dyn ReviewPolicy>> {
        self.review.as_ref().map(|r| {
            Box::new(RandomRejection::new(r.fail_probability, r.rework_fraction, r.seed))
                as Box<dyn ReviewPolicy>
        })
    }

    /// Build a ready-to-run simulator from this plan
    pub fn simulator(&self) -> Result<Simulator> {
        let (workers, features) = self.build()?;
        let mut simulator = Simulator::new(workers, features, self.strategy.build(), self.config)
            .with_validation(self.validate);
        if let Some(policy) = self.review_policy() {
            simulator = simulator.with_review_policy(policy);
        }
        Ok(simulator)
    }
}

impl FeaturePlan {
    fn build(&self, team: &[Worker], config: &SimulationConfig) -> Result<Feature> {
        let capacities = self
            .stages
            .iter()
            .map(|(stage, effort)| -> Result<(Stage, f64)> { Ok((stage.parse()?, *effort)) })
            .collect::<Result<Vec<_>>>()?;
        let initial_stage: Stage = self.initial_stage.parse()?;
        let coefficient = self.review_coefficient.unwrap_or(config.review_coefficient);

        let mut feature = Feature::new(self.name.clone(), capacities, initial_stage, coefficient)?;

        for name in &self.assignees {
            let id = WorkerId::from(name.as_str());
            if !team.iter().any(|w| *w.id() == id) {
                return Err(SprintError::UnknownWorker {
                    feature: self.name.clone(),
                    worker: name.clone(),
                });
            }
            feature.assign_id(id);
        }

        Ok(feature)
    }
}
