//! Simulation output and serialization

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::sprint::history::SprintHistory;
use crate::sprint::simulator::{RunOutcome, Simulator};

/// Complete simulation output
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub outcome: RunOutcome,
    pub history: SprintHistory,
    pub statistics: SimulationStats,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationStats {
    pub ticks_recorded: usize,
    pub ticks_per_day: u32,
    pub simulation_time_ms: u64,
    pub features_total: usize,
    pub features_completed: usize,
    pub features_incomplete: usize,
    pub workers: Vec<WorkerStats>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkerStats {
    pub name: String,
    pub worked_ticks: usize,
    pub idle_ticks: usize,
    /// Share of recorded ticks spent working, 0.0 to 1.0
    pub utilisation: f64,
}

impl SimulationOutput {
    pub fn new(simulator: Simulator, outcome: RunOutcome, elapsed: Duration) -> Self {
        let features_completed = simulator.completed_features().len();
        let features_incomplete = simulator.features().len();
        let ticks_per_day = simulator.config().ticks_per_day;
        let worker_names: Vec<String> = simulator
            .workers()
            .iter()
            .map(|w| w.name().to_string())
            .collect();

        let history = simulator.into_history();
        let ticks_recorded = history.len();

        let workers = worker_names
            .into_iter()
            .map(|name| {
                let worked_ticks = history
                    .worker_timeline(&name)
                    .iter()
                    .filter(|w| w.has_worked)
                    .count();
                let utilisation = if ticks_recorded == 0 {
                    0.0
                } else {
                    worked_ticks as f64 / ticks_recorded as f64
                };
                WorkerStats {
                    name,
                    worked_ticks,
                    idle_ticks: ticks_recorded - worked_ticks,
                    utilisation,
                }
            })
            .collect();

        Self {
            outcome,
            history,
            statistics: SimulationStats {
                ticks_recorded,
                ticks_per_day,
                simulation_time_ms: elapsed.as_millis() as u64,
                features_total: features_completed + features_incomplete,
                features_completed,
                features_incomplete,
                workers,
            },
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self)?)
    }

    pub fn summary(&self) -> String {
        let stats = &self.statistics;
        let mut lines = Vec::new();

        match &self.outcome {
            RunOutcome::Completed { finished_at, .. } => lines.push(format!(
                "All features completed at {} ({} ticks)",
                finished_at.label(),
                stats.ticks_recorded
            )),
            RunOutcome::MaxDaysReached { incomplete, .. } => lines.push(format!(
                "Max days reached after {} ticks; incomplete: {}",
                stats.ticks_recorded,
                incomplete.join(", ")
            )),
        }

        lines.push(format!(
            "Features completed: {}/{}",
            stats.features_completed, stats.features_total
        ));

        for worker in &stats.workers {
            lines.push(format!(
                "  {}: {} ticks worked, {} idle ({:.0}% utilised)",
                worker.name,
                worker.worked_ticks,
                worker.idle_ticks,
                worker.utilisation * 100.0
            ));
        }

        lines.join("\n")
    }
}
