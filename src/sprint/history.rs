//! Per-tick snapshots and the append-only history log

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::core::calendar::Tick;
use crate::core::types::{Effort, WorkerId};
use crate::sprint::feature::Feature;
use crate::sprint::stage::Stage;
use crate::sprint::worker::Worker;

/// Frozen state of one feature at a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSnapshot {
    pub name: String,
    pub current_stage: Stage,
    pub remaining: BTreeMap<Stage, Effort>,
    pub total_capacity: Effort,
    pub is_done: bool,
    pub contributors: BTreeSet<WorkerId>,
}

impl FeatureSnapshot {
    pub fn from_feature(feature: &Feature) -> Self {
        Self {
            name: feature.name().to_string(),
            current_stage: feature.current_stage(),
            remaining: feature.remaining_efforts().clone(),
            total_capacity: feature.total_capacity(),
            is_done: feature.is_done(),
            contributors: feature.contributors().clone(),
        }
    }

    pub fn total_remaining(&self) -> Effort {
        self.remaining.values().sum()
    }

    /// Completed share of total capacity, 0.0 to 100.0
    pub fn progress_percent(&self) -> f64 {
        if self.total_capacity <= 0.0 {
            return 100.0;
        }
        (100.0 * (1.0 - self.total_remaining() / self.total_capacity)).clamp(0.0, 100.0)
    }
}

/// Frozen state of one worker at a tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerSnapshot {
    pub name: String,
    pub has_worked: bool,
    pub current_task: Option<String>,
}

impl WorkerSnapshot {
    pub fn from_worker(worker: &Worker) -> Self {
        Self {
            name: worker.name().to_string(),
            has_worked: worker.has_worked(),
            current_task: worker.current_task().map(str::to_string),
        }
    }
}

/// Whole-simulation state at one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickSnapshot {
    pub tick: Tick,
    pub features: Vec<FeatureSnapshot>,
    pub workers: Vec<WorkerSnapshot>,
}

/// Chronological record of every processed tick
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SprintHistory {
    snapshots: Vec<TickSnapshot>,
}

impl SprintHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, tick: Tick, features: &[Feature], workers: &[Worker]) {
        self.snapshots.push(TickSnapshot {
            tick,
            features: features.iter().map(FeatureSnapshot::from_feature).collect(),
            workers: workers.iter().map(WorkerSnapshot::from_worker).collect(),
        });
    }

    pub fn snapshots(&self) -> &[TickSnapshot] {
        &self.snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn first(&self) -> Option<&TickSnapshot> {
        self.snapshots.first()
    }

    pub fn last(&self) -> Option<&TickSnapshot> {
        self.snapshots.last()
    }

    /// Snapshots of one feature for every tick it was active
    pub fn feature_timeline(&self, name: &str) -> Vec<&FeatureSnapshot> {
        self.snapshots
            .iter()
            .filter_map(|snap| snap.features.iter().find(|f| f.name == name))
            .collect()
    }

    pub fn worker_timeline(&self, name: &str) -> Vec<&WorkerSnapshot> {
        self.snapshots
            .iter()
            .filter_map(|snap| snap.workers.iter().find(|w| w.name == name))
            .collect()
    }

    /// Names of every feature that appears anywhere in the history, in order
    /// of first appearance
    pub fn feature_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for snap in &self.snapshots {
            for feature in &snap.features {
                if !names.contains(&feature.name.as_str()) {
                    names.push(&feature.name);
                }
            }
        }
        names
    }
}
