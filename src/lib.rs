pub mod core;
pub mod problem;

// Re-export commonly used types
pub use crate::core::config::ParkConfig;
pub use crate::core::errors::{ConfigError, SimulationError};
pub use crate::core::execution::{
    ConcurrencyMode, ReplicationRunner, ResponseSummary, RunnerConfig, SampleStatistic,
    SimulationEngine, SimulationObserver,
};
pub use crate::core::statistics::ReplicationResponses;
pub use crate::problem::{CapacityPartitionProblem, ObjectiveEstimate, ProblemConfig, ProblemError};
