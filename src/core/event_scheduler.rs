use super::errors::SimulationError;
use super::event::Event;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

#[derive(Debug)]
pub struct ScheduledEvent {
    pub sequence_num: u64,
    pub event: Event,
}

impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScheduledEvent {}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap (BinaryHeap is max-heap by default)
        other
            .event
            .time
            .total_cmp(&self.event.time)
            .then_with(|| other.event.kind.cmp(&self.event.kind))
            .then_with(|| other.sequence_num.cmp(&self.sequence_num))
    }
}

/// Time-ordered queue of pending events.
///
/// Events pop in increasing time; ties resolve by `EventKind` priority and
/// then in scheduling order.
pub struct EventScheduler {
    event_queue: BinaryHeap<ScheduledEvent>,
    sequence_counter: u64,
    current_time: f64,
}

impl EventScheduler {
    /// Create a new EventScheduler with the clock at zero
    pub fn new() -> Self {
        Self {
            event_queue: BinaryHeap::new(),
            sequence_counter: 0,
            current_time: 0.0,
        }
    }

    /// Schedule an event; refuses events earlier than the current time
    pub fn schedule(&mut self, event: Event) -> Result<(), SimulationError> {
        if !(event.time >= self.current_time) {
            return Err(SimulationError::EventInPast {
                scheduled: event.time,
                clock: self.current_time,
            });
        }

        self.event_queue.push(ScheduledEvent {
            sequence_num: self.sequence_counter,
            event,
        });
        self.sequence_counter += 1;
        Ok(())
    }

    /// Remove the earliest event and move the clock to its time
    pub fn pop_next(&mut self) -> Option<Event> {
        let scheduled = self.event_queue.pop()?;
        self.current_time = scheduled.event.time;
        Some(scheduled.event)
    }

    /// Check if there are any events remaining in the queue
    pub fn has_events(&self) -> bool {
        !self.event_queue.is_empty()
    }

    /// Get the next event time without removing events
    pub fn peek_next_time(&self) -> Option<f64> {
        self.event_queue.peek().map(|scheduled| scheduled.event.time)
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn pending(&self) -> usize {
        self.event_queue.len()
    }
}

impl Default for EventScheduler {
    fn default() -> Self {
        Self::new()
    }
}
