//! Feature stage state machine
//!
//! A feature carries remaining effort per stage and walks forward through the
//! pipeline as stages reach zero. Review is derived from Development effort
//! unless supplied explicitly, and may only be performed by workers who never
//! did Development work on the same feature.

use std::collections::{BTreeMap, BTreeSet};

use crate::core::error::{Result, SprintError};
use crate::core::types::{round_effort, Effort, WorkerId};
use crate::sprint::review::{ApproveAll, ReviewOutcome, ReviewPolicy};
use crate::sprint::stage::Stage;
use crate::sprint::worker::Worker;

#[derive(Debug, Clone)]
pub struct Feature {
    name: String,
    capacities: BTreeMap<Stage, Effort>,
    remaining: BTreeMap<Stage, Effort>,
    current_stage: Stage,
    /// Insertion-ordered, no duplicates
    assignees: Vec<WorkerId>,
    /// Workers who performed Development effort; never cleared
    contributors: BTreeSet<WorkerId>,
    review_coefficient: f64,
}

impl Feature {
    /// Build a feature, deriving the Review stage from Development when it is
    /// not given explicitly.
    ///
    /// Fails if any capacity or the review coefficient is negative or not
    /// finite, or if `initial_stage` is not one of the feature's stages after
    /// derivation.
    pub fn new(
        name: impl Into<String>,
        capacities: impl IntoIterator<Item = (Stage, Effort)>,
        initial_stage: Stage,
        review_coefficient: f64,
    ) -> Result<Self> {
        let name = name.into();
        let mut capacities: BTreeMap<Stage, Effort> = capacities.into_iter().collect();

        if let Some((stage, effort)) = capacities
            .iter()
            .find(|(_, effort)| !effort.is_finite() || **effort < 0.0)
        {
            return Err(SprintError::planning_for(
                name,
                format!("Stage {} has invalid effort: {}", stage, effort),
            ));
        }

        // Negated comparison so NaN is rejected too
        if !(review_coefficient >= 0.0) || review_coefficient.is_infinite() {
            return Err(SprintError::planning_for(
                name,
                format!("Invalid review coefficient: {}", review_coefficient),
            ));
        }

        if let Some(&development) = capacities.get(&Stage::Development) {
            capacities
                .entry(Stage::Review)
                .or_insert_with(|| round_effort(development * review_coefficient));
        }

        if !capacities.contains_key(&initial_stage) {
            return Err(SprintError::InvalidStage {
                feature: name,
                stage: initial_stage,
                available: capacities.keys().copied().collect(),
            });
        }

        Ok(Self {
            name,
            remaining: capacities.clone(),
            capacities,
            current_stage: initial_stage,
            assignees: Vec::new(),
            contributors: BTreeSet::new(),
            review_coefficient,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn current_stage(&self) -> Stage {
        self.current_stage
    }

    pub fn review_coefficient(&self) -> f64 {
        self.review_coefficient
    }

    /// Stages this feature goes through, in pipeline order
    pub fn stages(&self) -> impl Iterator<Item = Stage> + '_ {
        self.capacities.keys().copied()
    }

    pub fn has_stage(&self, stage: Stage) -> bool {
        self.remaining.contains_key(&stage)
    }

    /// Original effort for a stage, 0 when the stage is absent
    pub fn stage_capacity(&self, stage: Stage) -> Effort {
        self.capacities.get(&stage).copied().unwrap_or(0.0)
    }

    pub fn remaining(&self, stage: Stage) -> Effort {
        self.remaining.get(&stage).copied().unwrap_or(0.0)
    }

    pub fn remaining_efforts(&self) -> &BTreeMap<Stage, Effort> {
        &self.remaining
    }

    pub fn total_capacity(&self) -> Effort {
        self.capacities.values().sum()
    }

    pub fn total_remaining(&self) -> Effort {
        self.remaining.values().sum()
    }

    /// Review stage present with non-zero effort
    pub fn has_review(&self) -> bool {
        self.stage_capacity(Stage::Review) > 0.0
    }

    pub fn is_done(&self) -> bool {
        self.remaining.values().all(|effort| *effort <= 0.0)
    }

    pub fn assignees(&self) -> &[WorkerId] {
        &self.assignees
    }

    pub fn is_assigned(&self, worker: &WorkerId) -> bool {
        self.assignees.contains(worker)
    }

    pub fn contributors(&self) -> &BTreeSet<WorkerId> {
        &self.contributors
    }

    pub fn assign(&mut self, worker: &Worker) {
        self.assign_id(worker.id().clone());
    }

    pub fn assign_id(&mut self, worker: WorkerId) {
        if !self.assignees.contains(&worker) {
            self.assignees.push(worker);
        }
    }

    pub fn register_development_contributor(&mut self, worker: &WorkerId) {
        if !self.contributors.contains(worker) {
            self.contributors.insert(worker.clone());
        }
    }

    /// Whether `worker` may spend effort on the current stage this tick.
    ///
    /// Review accepts any capable worker who has not contributed to
    /// Development, assigned or not. Every other stage needs an assignee.
    pub fn can_be_worked_by(&self, worker: &Worker) -> bool {
        if self.is_done() || !worker.can_work_stage(self.current_stage) {
            return false;
        }

        if self.current_stage == Stage::Review {
            return !self.contributors.contains(worker.id());
        }

        self.is_assigned(worker.id())
    }

    /// Subtract effort from the current stage, clamped at zero
    pub fn apply_work(&mut self, effort: Effort) {
        let stage = self.current_stage;
        let Some(remaining) = self.remaining.get_mut(&stage) else {
            return;
        };
        *remaining = round_effort(*remaining - effort.max(0.0)).max(0.0);
        tracing::trace!("{} {} remaining: {:.2}", self.name, stage, remaining);
    }

    /// Move past a finished stage. Returns true once no stage is left.
    ///
    /// The caller owns removal of completed features from its active set.
    pub fn try_advance(&mut self) -> bool {
        self.try_advance_with(&mut ApproveAll)
    }

    /// Same as [`Feature::try_advance`], but a finished Review stage is first
    /// handed to `policy`, which may send the feature back to Development.
    pub fn try_advance_with(&mut self, policy: &mut dyn ReviewPolicy) -> bool {
        if self.remaining(self.current_stage) > 0.0 {
            return false;
        }

        tracing::debug!("{} finished {}", self.name, self.current_stage);

        if self.current_stage == Stage::Review {
            if let ReviewOutcome::Rework { fraction } = policy.review(self) {
                if self.send_back_for_rework(fraction) {
                    return false;
                }
            }
        }

        let next = self
            .current_stage
            .following()
            .iter()
            .copied()
            .find(|stage| self.remaining.contains_key(stage));

        match next {
            Some(stage) => {
                self.current_stage = stage;
                tracing::debug!("{} moved to {}", self.name, stage);
                false
            }
            None => {
                tracing::info!("Feature {} fully completed", self.name);
                true
            }
        }
    }

    /// Return to Development with a fraction of the original development
    /// effort outstanding and Review reset to full. Contributors are kept.
    ///
    /// Returns false, changing nothing, when the feature has no Development
    /// stage.
    fn send_back_for_rework(&mut self, fraction: f64) -> bool {
        if !self.has_stage(Stage::Development) {
            return false;
        }

        let development = self.stage_capacity(Stage::Development);
        let review = self.stage_capacity(Stage::Review);
        self.remaining.insert(
            Stage::Development,
            round_effort(development * fraction.clamp(0.0, 1.0)),
        );
        self.remaining.insert(Stage::Review, review);
        self.current_stage = Stage::Development;

        tracing::info!("Review rejected {}, back to {}", self.name, Stage::Development);
        true
    }
}
