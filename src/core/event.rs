use super::types::NodeIndex;

/// Kind of a scheduled event.
///
/// The declaration order is the tie-break priority for events sharing the
/// same timestamp: completions first, then arrivals, then closing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EventKind {
    ServiceCompletion,
    Arrival,
    ParkClose,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    pub time: f64,
    pub kind: EventKind,
    /// Attraction the event belongs to; `None` only for `ParkClose`
    pub target: Option<NodeIndex>,
}

impl Event {
    pub fn arrival(time: f64, target: NodeIndex) -> Self {
        Self {
            time,
            kind: EventKind::Arrival,
            target: Some(target),
        }
    }

    pub fn service_completion(time: f64, target: NodeIndex) -> Self {
        Self {
            time,
            kind: EventKind::ServiceCompletion,
            target: Some(target),
        }
    }

    pub fn park_close(time: f64) -> Self {
        Self {
            time,
            kind: EventKind::ParkClose,
            target: None,
        }
    }
}
