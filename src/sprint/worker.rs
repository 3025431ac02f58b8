//! Team members and the stages their role lets them work

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::SprintError;
use crate::core::types::{Effort, WorkerId};
use crate::sprint::feature::Feature;
use crate::sprint::stage::Stage;

/// Label recorded for a worker that found nothing to do this tick
pub const IDLE_TASK: &str = "Idle";

/// Role tag; the role alone decides which stages a worker may perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Implements features and reviews other people's work
    Developer,
    /// Requirements and analysis
    #[serde(alias = "system_analyst")]
    Analyst,
    /// Testing
    Qa,
}

impl Role {
    pub fn stages(&self) -> &'static [Stage] {
        match self {
            Role::Developer => &[Stage::Development, Stage::Review],
            Role::Analyst => &[Stage::Analytics],
            Role::Qa => &[Stage::Testing],
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Role::Developer => "Developer",
            Role::Analyst => "System Analyst",
            Role::Qa => "QA",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Role {
    type Err = SprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "developer" | "dev" => Ok(Role::Developer),
            "analyst" | "system_analyst" | "system analyst" => Ok(Role::Analyst),
            "qa" | "tester" => Ok(Role::Qa),
            other => Err(SprintError::Config(format!("unknown role: {}", other))),
        }
    }
}

/// A team member with a fixed role and daily productivity.
///
/// `worked_this_tick` and `current_task` are transient and describe only the
/// tick being processed.
#[derive(Debug, Clone)]
pub struct Worker {
    id: WorkerId,
    role: Role,
    productivity_per_day: Effort,
    worked_this_tick: bool,
    current_task: Option<String>,
}

impl Worker {
    pub fn new(name: impl Into<String>, role: Role, productivity_per_day: Effort) -> Self {
        Self {
            id: WorkerId::new(name),
            role,
            productivity_per_day,
            worked_this_tick: false,
            current_task: None,
        }
    }

    pub fn developer(name: impl Into<String>, productivity_per_day: Effort) -> Self {
        Self::new(name, Role::Developer, productivity_per_day)
    }

    pub fn analyst(name: impl Into<String>, productivity_per_day: Effort) -> Self {
        Self::new(name, Role::Analyst, productivity_per_day)
    }

    pub fn qa(name: impl Into<String>, productivity_per_day: Effort) -> Self {
        Self::new(name, Role::Qa, productivity_per_day)
    }

    pub fn id(&self) -> &WorkerId {
        &self.id
    }

    pub fn name(&self) -> &str {
        self.id.as_str()
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn productivity_per_day(&self) -> Effort {
        self.productivity_per_day
    }

    /// Effort produced in a single tick
    pub fn effort_per_tick(&self, ticks_per_day: u32) -> Effort {
        self.productivity_per_day / ticks_per_day as f64
    }

    /// Role capability only; feature-level rules are checked by the feature
    pub fn can_work_stage(&self, stage: Stage) -> bool {
        self.role.stages().contains(&stage)
    }

    pub fn effective_stages(&self) -> &'static [Stage] {
        self.role.stages()
    }

    pub fn has_worked(&self) -> bool {
        self.worked_this_tick
    }

    pub fn current_task(&self) -> Option<&str> {
        self.current_task.as_deref()
    }

    /// Clear per-tick state; called before every assignment pass
    pub fn reset_tick(&mut self) {
        self.worked_this_tick = false;
        self.current_task = None;
    }

    /// Spend one tick of effort on the feature's current stage
    pub fn work(&mut self, feature: &mut Feature, ticks_per_day: u32) {
        let stage = feature.current_stage();
        tracing::debug!("{} working on {} [{}]", self.id, feature.name(), stage);

        if stage == Stage::Development {
            feature.register_development_contributor(&self.id);
        }

        feature.apply_work(self.effort_per_tick(ticks_per_day));
        self.worked_this_tick = true;
        self.current_task = Some(feature.name().to_string());
    }

    pub fn idle(&mut self) {
        tracing::debug!("{} is idle this tick", self.id);
        self.current_task = Some(IDLE_TASK.to_string());
    }
}
