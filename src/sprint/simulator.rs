//! Main simulation loop
//!
//! Each tick runs in four steps, fully completed before the next tick:
//!
//! 1. Reset every worker's per-tick state
//! 2. In worker order, ask the strategy for a feature and work it (or idle)
//! 3. Record a snapshot of all active features and all workers
//! 4. In feature order, try to advance each feature; drop completed ones
//!
//! Assignment is greedy in worker order. An earlier worker can take the last
//! eligible work on a feature and leave a later worker idle, so reordering the
//! worker list changes results.

use serde::{Deserialize, Serialize};

use crate::core::calendar::{Calendar, Tick};
use crate::core::config::SimulationConfig;
use crate::core::error::Result;
use crate::sprint::feature::Feature;
use crate::sprint::history::SprintHistory;
use crate::sprint::review::{ApproveAll, ReviewPolicy};
use crate::sprint::strategy::AssignmentStrategy;
use crate::sprint::validator::SprintValidator;
use crate::sprint::worker::Worker;

/// How a run ended
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RunOutcome {
    /// Every feature finished; `finished_at` is the tick that emptied the
    /// active set
    Completed { ticks: usize, finished_at: Tick },
    /// The day bound ran out with features still active
    MaxDaysReached { ticks: usize, incomplete: Vec<String> },
}

impl RunOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed { .. })
    }

    pub fn ticks(&self) -> usize {
        match self {
            RunOutcome::Completed { ticks, .. } | RunOutcome::MaxDaysReached { ticks, .. } => {
                *ticks
            }
        }
    }
}

pub struct Simulator {
    config: SimulationConfig,
    workers: Vec<Worker>,
    /// Active features in declared order
    features: Vec<Feature>,
    /// Completed features in completion order
    completed: Vec<Feature>,
    strategy: Box<dyn AssignmentStrategy>,
    review_policy: Box<dyn ReviewPolicy>,
    validate: bool,
    warnings: Vec<String>,
    history: SprintHistory,
}

impl Simulator {
    pub fn new(
        workers: Vec<Worker>,
        features: Vec<Feature>,
        strategy: Box<dyn AssignmentStrategy>,
        config: SimulationConfig,
    ) -> Self {
        Self {
            config,
            workers,
            features,
            completed: Vec::new(),
            strategy,
            review_policy: Box::new(ApproveAll),
            validate: true,
            warnings: Vec::new(),
            history: SprintHistory::new(),
        }
    }

    /// Skip pre-flight validation. Invalid plans then simply stall.
    pub fn without_validation(mut self) -> Self {
        self.validate = false;
        self
    }

    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    pub fn with_review_policy(mut self, policy: Box<dyn ReviewPolicy>) -> Self {
        self.review_policy = policy;
        self
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn workers(&self) -> &[Worker] {
        &self.workers
    }

    /// Features still in progress
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn completed_features(&self) -> &[Feature] {
        &self.completed
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Warnings gathered by the last validation
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn history(&self) -> &SprintHistory {
        &self.history
    }

    pub fn into_history(self) -> SprintHistory {
        self.history
    }

    /// Validate the plan and collect non-fatal warnings
    pub fn validate(&mut self) -> Result<()> {
        self.config.validate()?;
        SprintValidator::validate(&self.features, &self.workers)?;
        self.warnings = SprintValidator::validation_warnings(&self.features, &self.workers);
        Ok(())
    }

    /// Run until every feature completes or `max_days` working days pass.
    ///
    /// With validation enabled, an invalid plan fails here and no tick runs.
    pub fn run(&mut self, max_days: u32) -> Result<RunOutcome> {
        if self.validate {
            self.validate()?;
        } else {
            self.config.validate()?;
        }

        tracing::info!(
            "Sprint simulation started: {} workers, {} features, max {} days, strategy {}",
            self.workers.len(),
            self.features.len(),
            max_days,
            self.strategy.name()
        );
        for warning in &self.warnings {
            tracing::warn!("{}", warning);
        }

        for tick in Calendar::new(self.config.ticks_per_day, max_days) {
            tracing::debug!("{}", tick.label());
            self.process_tick(tick);

            if self.features.is_empty() {
                tracing::info!("All features completed at {}", tick.label());
                return Ok(RunOutcome::Completed {
                    ticks: self.history.len(),
                    finished_at: tick,
                });
            }
        }

        let incomplete: Vec<String> = self.features.iter().map(|f| f.name().to_string()).collect();
        tracing::info!(
            "Max days reached after {} ticks, {} features incomplete",
            self.history.len(),
            incomplete.len()
        );
        Ok(RunOutcome::MaxDaysReached {
            ticks: self.history.len(),
            incomplete,
        })
    }

    /// Process a single tick: reset, assign and work, snapshot, advance
    pub fn process_tick(&mut self, tick: Tick) {
        let ticks_per_day = self.config.ticks_per_day;

        for worker in &mut self.workers {
            worker.reset_tick();
        }

        for worker in &mut self.workers {
            match self.strategy.choose_feature(worker, &self.features) {
                Some(idx) => worker.work(&mut self.features[idx], ticks_per_day),
                None => worker.idle(),
            }
        }

        self.history.record(tick, &self.features, &self.workers);

        self.advance_features();
    }

    fn advance_features(&mut self) {
        let mut still_active = Vec::with_capacity(self.features.len());
        for mut feature in self.features.drain(..) {
            if feature.try_advance_with(self.review_policy.as_mut()) {
                self.completed.push(feature);
            } else {
                still_active.push(feature);
            }
        }
        self.features = still_active;
    }
}
