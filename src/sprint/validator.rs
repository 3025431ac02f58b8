//! Pre-flight validation of a sprint plan
//!
//! Runs once before the first tick. Errors are fail-fast: the first problem
//! found is returned and nothing else is checked.

use ahash::AHashMap;

use crate::core::error::{Result, SprintError};
use crate::core::types::WorkerId;
use crate::sprint::feature::Feature;
use crate::sprint::stage::Stage;
use crate::sprint::worker::Worker;

pub struct SprintValidator;

impl SprintValidator {
    /// Prove the plan can be simulated, or return the first reason it can't
    pub fn validate(features: &[Feature], workers: &[Worker]) -> Result<()> {
        if features.is_empty() {
            return Err(SprintError::planning("No features provided for simulation"));
        }

        if workers.is_empty() {
            return Err(SprintError::planning("No workers provided for simulation"));
        }

        if let Some(feature) = features.iter().find(|f| f.assignees().is_empty()) {
            return Err(SprintError::planning_for(
                feature.name(),
                "Feature has no assigned workers",
            ));
        }

        // Negated comparison so NaN is rejected too
        if let Some(worker) = workers.iter().find(|w| !(w.productivity_per_day() > 0.0)) {
            return Err(SprintError::planning(format!(
                "Worker {} has invalid productivity: {}",
                worker.name(),
                worker.productivity_per_day()
            )));
        }

        Self::validate_review_coverage(features, workers)
    }

    /// Every feature with review effort needs a Review-capable worker who is
    /// not one of its assigned developers.
    ///
    /// This looks at assignments, not actual contributions, so passing it
    /// does not guarantee a reviewer will be free when review starts.
    fn validate_review_coverage(features: &[Feature], workers: &[Worker]) -> Result<()> {
        let team = team_index(workers);
        let reviewers: Vec<&Worker> = workers
            .iter()
            .filter(|w| w.can_work_stage(Stage::Review))
            .collect();

        for feature in features.iter().filter(|f| f.has_review()) {
            let assigned_developers = assigned_developers(feature, &team);

            let has_external_reviewer = reviewers
                .iter()
                .any(|reviewer| !assigned_developers.contains(reviewer.id()));

            if !has_external_reviewer {
                return Err(SprintError::NoReviewerAvailable {
                    feature: feature.name().to_string(),
                    assigned_developers,
                    team_developers: workers
                        .iter()
                        .filter(|w| w.can_work_stage(Stage::Development))
                        .map(|w| w.id().clone())
                        .collect(),
                });
            }
        }

        Ok(())
    }

    /// Non-fatal advisories about the plan
    pub fn validation_warnings(features: &[Feature], workers: &[Worker]) -> Vec<String> {
        let mut warnings = Vec::new();

        for worker in workers {
            let has_work = features.iter().any(|f| has_reachable_work(f, worker));
            if !has_work {
                warnings.push(format!("Worker {} may have no eligible work", worker.name()));
            }
        }

        let team = team_index(workers);
        for feature in features.iter().filter(|f| f.has_review()) {
            if assigned_developers(feature, &team).len() == 1 {
                warnings.push(format!(
                    "Feature {} has only one developer assigned; external reviewer will be required",
                    feature.name()
                ));
            }
        }

        warnings
    }
}

fn team_index(workers: &[Worker]) -> AHashMap<&WorkerId, &Worker> {
    workers.iter().map(|w| (w.id(), w)).collect()
}

/// Development-capable assignees of `feature`, in assignment order
fn assigned_developers(feature: &Feature, team: &AHashMap<&WorkerId, &Worker>) -> Vec<WorkerId> {
    feature
        .assignees()
        .iter()
        .filter(|id| {
            team.get(id)
                .is_some_and(|w| w.can_work_stage(Stage::Development))
        })
        .cloned()
        .collect()
}

/// Whether any remaining stage of `feature` could ever be worked by `worker`
fn has_reachable_work(feature: &Feature, worker: &Worker) -> bool {
    feature.stages().any(|stage| {
        if !worker.can_work_stage(stage) || feature.remaining(stage) <= 0.0 {
            return false;
        }
        if stage == Stage::Review {
            return !feature.contributors().contains(worker.id());
        }
        feature.is_assigned(worker.id())
    })
}
