/// Index of an attraction inside the park (0-based).
pub type NodeIndex = usize;

/// Where a tourist attempting to join an attraction came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrivalOrigin {
    /// Exogenous arrival from outside the park
    External,
    /// Tourist routed here after finishing service at another attraction
    RoutedFrom(NodeIndex),
}

/// Where a tourist goes after finishing service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingDecision {
    Depart,
    To(NodeIndex),
}

/// Lifecycle of a single replication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParkPhase {
    /// Before closing time; exogenous arrivals are admitted
    Open,
    /// Closing time has passed; only in-flight services complete
    Draining,
    /// Event queue exhausted
    Closed,
}

impl std::fmt::Display for ParkPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParkPhase::Open => write!(f, "open"),
            ParkPhase::Draining => write!(f, "draining"),
            ParkPhase::Closed => write!(f, "closed"),
        }
    }
}
