use super::event::EventKind;
use super::types::NodeIndex;
use thiserror::Error;

/// Caller-fixable problems with a park configuration.
///
/// Raised by `ParkConfig::validate` before any simulation runs. Values are
/// never clamped or normalized on the caller's behalf.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("park must have at least one attraction")]
    NoAttractions,

    #[error("{factor} has {actual} entries, expected {expected}")]
    LengthMismatch {
        factor: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("time_open must be finite and non-negative, got {0}")]
    InvalidTimeOpen(f64),

    #[error("queue capacities sum to {sum}, park capacity is {park_capacity}")]
    CapacityBudgetMismatch { sum: u64, park_capacity: u64 },

    #[error("{factor}[{index}] must be finite and non-negative, got {value}")]
    InvalidRate {
        factor: &'static str,
        index: NodeIndex,
        value: f64,
    },

    #[error("erlang_rate[{index}] must be positive, got {value}")]
    NonPositiveServiceRate { index: NodeIndex, value: f64 },

    #[error("erlang_shape[{index}] must be at least 1")]
    ZeroErlangShape { index: NodeIndex },

    #[error("routing probability for attraction {row} (column {column}) must be in [0, 1], got {value}")]
    InvalidProbability {
        row: NodeIndex,
        column: usize,
        value: f64,
    },

    #[error("routing row for attraction {row} sums to {sum}, expected 1")]
    RoutingRowSum { row: NodeIndex, sum: f64 },
}

/// Failures while running a replication
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SimulationError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("event scheduled at {scheduled} but the clock is already at {clock}")]
    EventInPast { scheduled: f64, clock: f64 },

    #[error("{stream} stream for attraction {node} produced an invalid variate {value}")]
    InvalidVariate {
        stream: &'static str,
        node: NodeIndex,
        value: f64,
    },

    #[error("distribution for attraction {node} could not be built: {reason}")]
    Distribution { node: NodeIndex, reason: String },

    #[error("{kind:?} event has no target attraction")]
    UntargetedEvent { kind: EventKind },

    #[error("replication range {start}..{end} is too long for this platform")]
    ReplicationRange { start: u64, end: u64 },

    #[error("failed to build replication thread pool: {0}")]
    ThreadPool(String),
}
