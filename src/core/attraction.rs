/// Result of a tourist trying to join an attraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionOutcome {
    /// Server was idle; the tourist went straight into service
    EnteredService,
    /// Server busy, tourist waits in the queue
    Queued,
    /// Queue at capacity, tourist is lost
    Blocked,
}

/// Result of a service completion at an attraction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// The head of the queue entered service
    NextStarted,
    /// Nobody was waiting; the server is now idle
    WentIdle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeState {
    Idle,
    Busy,
    Full,
}

/// Single server with a bounded waiting room.
///
/// `capacity` counts waiting places only; the tourist in service does not
/// occupy one. A node with capacity 0 admits only into an idle server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttractionNode {
    capacity: u32,
    server_busy: bool,
    queue_length: u32,
}

impl AttractionNode {
    pub fn new(capacity: u32) -> Self {
        Self {
            capacity,
            server_busy: false,
            queue_length: 0,
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn server_busy(&self) -> bool {
        self.server_busy
    }

    pub fn queue_length(&self) -> u32 {
        self.queue_length
    }

    /// Tourists at the attraction, in service plus waiting
    pub fn occupancy(&self) -> u32 {
        u32::from(self.server_busy) + self.queue_length
    }

    pub fn state(&self) -> NodeState {
        match (self.server_busy, self.queue_length == self.capacity) {
            (false, _) => NodeState::Idle,
            (true, true) => NodeState::Full,
            (true, false) => NodeState::Busy,
        }
    }

    /// Apply an arrival attempt
    pub fn admit(&mut self) -> AdmissionOutcome {
        if !self.server_busy {
            self.server_busy = true;
            AdmissionOutcome::EnteredService
        } else if self.queue_length < self.capacity {
            self.queue_length += 1;
            AdmissionOutcome::Queued
        } else {
            AdmissionOutcome::Blocked
        }
    }

    /// The tourist in service leaves the server.
    ///
    /// Must only be called while the server is busy; the engine guarantees
    /// this because every completion event is scheduled by a service start.
    pub fn complete_service(&mut self) -> CompletionOutcome {
        debug_assert!(self.server_busy, "completion at an idle attraction");
        if self.queue_length > 0 {
            self.queue_length -= 1;
            CompletionOutcome::NextStarted
        } else {
            self.server_busy = false;
            CompletionOutcome::WentIdle
        }
    }

    /// Empty the waiting room at closing time, returning how many left
    pub fn drain_queue(&mut self) -> u32 {
        std::mem::take(&mut self.queue_length)
    }
}
