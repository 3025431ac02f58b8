//! Sprint engine - features, workers, assignment, validation, and the tick loop

pub mod feature;
pub mod history;
pub mod output;
pub mod plan;
pub mod report;
pub mod review;
pub mod simulator;
pub mod stage;
pub mod strategy;
pub mod validator;
pub mod worker;

pub use feature::Feature;
pub use history::{FeatureSnapshot, SprintHistory, TickSnapshot, WorkerSnapshot};
pub use output::{SimulationOutput, SimulationStats, WorkerStats};
pub use plan::SprintPlan;
pub use report::HtmlReport;
pub use review::{ApproveAll, RandomRejection, ReviewOutcome, ReviewPolicy};
pub use simulator::{RunOutcome, Simulator};
pub use stage::Stage;
pub use strategy::{
    AssignmentStrategy, FirstMatchStrategy, LeastRemainingStrategy, StrategyKind,
};
pub use validator::SprintValidator;
pub use worker::{Role, Worker, IDLE_TASK};
