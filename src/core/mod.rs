pub mod calendar;
pub mod config;
pub mod error;
pub mod types;

pub use calendar::{Calendar, Tick};
pub use config::SimulationConfig;
pub use error::{Result, SprintError};
pub use types::{round_effort, Effort, WorkerId};
