use thiserror::Error;

use crate::core::types::WorkerId;
use crate::sprint::stage::Stage;

#[derive(Error, Debug)]
pub enum SprintError {
    #[error("{}", planning_message(.feature.as_deref(), .message))]
    Planning {
        message: String,
        feature: Option<String>,
    },

    #[error(
        "[{feature}] No eligible code reviewers available. \
         Assigned developers: {}. Team developers: {}. \
         Reviewers must not participate in development.",
        join_ids(.assigned_developers),
        join_ids(.team_developers)
    )]
    NoReviewerAvailable {
        feature: String,
        assigned_developers: Vec<WorkerId>,
        team_developers: Vec<WorkerId>,
    },

    #[error("[{feature}] Initial stage {stage} must be one of its stages: {}", join_stages(.available))]
    InvalidStage {
        feature: String,
        stage: Stage,
        available: Vec<Stage>,
    },

    #[error("Invalid tick: day {day}, slot {slot} (slots per day: {ticks_per_day})")]
    InvalidTick {
        day: u32,
        slot: u32,
        ticks_per_day: u32,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("[{feature}] Unknown worker in assignees: {worker}")]
    UnknownWorker { feature: String, worker: String },

    #[error("Unknown stage: {0}")]
    UnknownStage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Plan parse error: {0}")]
    PlanParse(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SprintError {
    pub fn planning(message: impl Into<String>) -> Self {
        Self::Planning {
            message: message.into(),
            feature: None,
        }
    }

    pub fn planning_for(feature: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Planning {
            message: message.into(),
            feature: Some(feature.into()),
        }
    }

    /// True for every error that rejects a plan before the first tick:
    /// malformed features, unresolvable plan references and the
    /// reviewer-coverage refinement.
    pub fn is_planning_error(&self) -> bool {
        matches!(
            self,
            Self::Planning { .. }
                | Self::NoReviewerAvailable { .. }
                | Self::InvalidStage { .. }
                | Self::UnknownWorker { .. }
                | Self::UnknownStage(_)
        )
    }

    /// Name of the feature that caused the error, when one is known
    pub fn feature_name(&self) -> Option<&str> {
        match self {
            Self::Planning { feature, .. } => feature.as_deref(),
            Self::NoReviewerAvailable { feature, .. }
            | Self::InvalidStage { feature, .. }
            | Self::UnknownWorker { feature, .. } => Some(feature),
            _ => None,
        }
    }
}

fn planning_message(feature: Option<&str>, message: &str) -> String {
    match feature {
        Some(name) => format!("[{}] {}", name, message),
        None => format!("Planning Error: {}", message),
    }
}

fn join_ids(ids: &[WorkerId]) -> String {
    let names: Vec<&str> = ids.iter().map(WorkerId::as_str).collect();
    format!("[{}]", names.join(", "))
}

fn join_stages(stages: &[Stage]) -> String {
    let names: Vec<&str> = stages.iter().map(|s| s.display_name()).collect();
    names.join(", ")
}

pub type Result<T> = std::result::Result<T, SprintError>;
