pub mod config;
pub mod replication;
pub mod simulation_engine;

// Re-export commonly used types
pub use config::{ConcurrencyMode, RunnerConfig};
pub use replication::{ReplicationRunner, ResponseSummary, SampleStatistic};
pub use simulation_engine::{SimulationEngine, SimulationObserver};
