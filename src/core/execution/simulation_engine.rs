use crate::core::attraction::{AdmissionOutcome, AttractionNode, CompletionOutcome};
use crate::core::config::ParkConfig;
use crate::core::errors::SimulationError;
use crate::core::event::{Event, EventKind};
use crate::core::event_scheduler::EventScheduler;
use crate::core::statistics::{ReplicationResponses, StatisticsAccumulator};
use crate::core::types::{ArrivalOrigin, NodeIndex, ParkPhase, RoutingDecision};
use crate::core::variates::RandomVariateSource;
use log::{debug, trace};

/// Observer trait for simulation events
pub trait SimulationObserver {
    /// Called when the simulation clock advances
    fn on_clock_advance(&mut self, old_time: f64, new_time: f64);

    /// Called after an event has been fully processed, including any
    /// routing it triggered
    fn on_event_processed(&mut self, event: &Event, phase: ParkPhase);
}

/// Event loop of one replication, from opening to the end of the drain.
///
/// The engine owns all per-replication state; nothing is shared between
/// replications.
pub struct SimulationEngine {
    nodes: Vec<AttractionNode>,
    scheduler: EventScheduler,
    variates: RandomVariateSource,
    stats: StatisticsAccumulator,
    phase: ParkPhase,
    time_open: f64,
    events_processed: u64,
    observers: Vec<Box<dyn SimulationObserver>>,
}

impl SimulationEngine {
    /// Validate `config` and prepare replication `replication` of `seed`
    pub fn new(config: &ParkConfig, seed: u64, replication: u64) -> Result<Self, SimulationError> {
        config.validate()?;

        let nodes = config
            .queue_capacities
            .iter()
            .map(|&capacity| AttractionNode::new(capacity))
            .collect();
        let mut engine = Self {
            nodes,
            scheduler: EventScheduler::new(),
            variates: RandomVariateSource::new(config, seed, replication)?,
            stats: StatisticsAccumulator::new(config.number_attractions, config.time_open),
            phase: ParkPhase::Open,
            time_open: config.time_open,
            events_processed: 0,
            observers: Vec::new(),
        };
        engine.schedule_initial_events()?;
        Ok(engine)
    }

    fn schedule_initial_events(&mut self) -> Result<(), SimulationError> {
        if self.time_open > 0.0 {
            for node in 0..self.nodes.len() {
                if self.variates.has_exogenous_arrivals(node) {
                    let delay = self.variates.next_interarrival(node)?;
                    self.scheduler.schedule(Event::arrival(delay, node))?;
                }
            }
        }
        self.scheduler.schedule(Event::park_close(self.time_open))
    }

    /// Add an observer to the simulation
    pub fn add_observer(&mut self, observer: Box<dyn SimulationObserver>) {
        self.observers.push(observer);
    }

    /// Run to completion and return the replication responses
    pub fn run(mut self) -> Result<ReplicationResponses, SimulationError> {
        while self.step()? {}
        let clock = self.clock();
        debug!(
            "Replication finished at t={:.3} after {} events",
            clock, self.events_processed
        );
        Ok(self.stats.into_responses(clock))
    }

    /// Process one event, returns true if events remain
    pub fn step(&mut self) -> Result<bool, SimulationError> {
        let old_time = self.clock();
        let event = match self.scheduler.pop_next() {
            Some(event) => event,
            None => {
                self.phase = ParkPhase::Closed;
                return Ok(false);
            }
        };

        // Integrate the pre-event state over the elapsed interval
        self.stats.integrate(event.time, &self.nodes);
        if event.time != old_time {
            for observer in &mut self.observers {
                observer.on_clock_advance(old_time, event.time);
            }
        }

        trace!("t={:.4} {:?} at {:?}", event.time, event.kind, event.target);
        match (event.kind, event.target) {
            (EventKind::ParkClose, _) => self.close_park(),
            (EventKind::Arrival, Some(node)) => self.handle_exogenous_arrival(node)?,
            (EventKind::ServiceCompletion, Some(node)) => self.handle_completion(node)?,
            (kind, None) => return Err(SimulationError::UntargetedEvent { kind }),
        }
        self.events_processed += 1;

        for observer in &mut self.observers {
            observer.on_event_processed(&event, self.phase);
        }

        if self.scheduler.has_events() {
            Ok(true)
        } else {
            debug!("Event queue empty, park {} -> closed", self.phase);
            self.phase = ParkPhase::Closed;
            Ok(false)
        }
    }

    fn close_park(&mut self) {
        debug!("Closing time t={:.3}, park {} -> draining", self.clock(), self.phase);
        self.phase = ParkPhase::Draining;
        for (index, node) in self.nodes.iter_mut().enumerate() {
            let left = node.drain_queue();
            if left > 0 {
                trace!("Attraction {}: {} tourists left the queue at closing", index, left);
            }
            self.stats.record_closing_drain(index, left);
        }
    }

    fn handle_exogenous_arrival(&mut self, node: NodeIndex) -> Result<(), SimulationError> {
        if self.phase != ParkPhase::Open {
            return Ok(());
        }
        self.attempt_arrival(node, ArrivalOrigin::External)?;

        let next = self.clock() + self.variates.next_interarrival(node)?;
        self.scheduler.schedule(Event::arrival(next, node))
    }

    fn handle_completion(&mut self, node: NodeIndex) -> Result<(), SimulationError> {
        self.stats.record_completion(node);
        if self.nodes[node].complete_service() == CompletionOutcome::NextStarted {
            self.start_service(node)?;
        }

        if self.phase != ParkPhase::Open {
            return Ok(());
        }
        match self.variates.next_routing_decision(node) {
            RoutingDecision::Depart => Ok(()),
            RoutingDecision::To(target) => {
                self.attempt_arrival(target, ArrivalOrigin::RoutedFrom(node))
            }
        }
    }

    fn attempt_arrival(
        &mut self,
        node: NodeIndex,
        origin: ArrivalOrigin,
    ) -> Result<(), SimulationError> {
        let outcome = self.nodes[node].admit();
        self.stats.record_arrival(node, origin, outcome);
        match outcome {
            AdmissionOutcome::EnteredService => self.start_service(node),
            AdmissionOutcome::Queued => Ok(()),
            AdmissionOutcome::Blocked => {
                trace!("Attraction {} full, {:?} tourist lost", node, origin);
                Ok(())
            }
        }
    }

    fn start_service(&mut self, node: NodeIndex) -> Result<(), SimulationError> {
        let done = self.clock() + self.variates.next_service_duration(node)?;
        self.scheduler.schedule(Event::service_completion(done, node))
    }

    /// Get current simulation time
    pub fn clock(&self) -> f64 {
        self.scheduler.current_time()
    }

    pub fn phase(&self) -> ParkPhase {
        self.phase
    }

    pub fn nodes(&self) -> &[AttractionNode] {
        &self.nodes
    }

    pub fn statistics(&self) -> &StatisticsAccumulator {
        &self.stats
    }

    pub fn events_processed(&self) -> u64 {
        self.events_processed
    }

    /// Check if there are pending events in the scheduler
    pub fn has_pending_events(&self) -> bool {
        self.scheduler.has_events()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untargeted_event_is_an_error() {
        let config = ParkConfig::uniform(2, 4).with_arrival_gammas(vec![0.0, 0.0]);
        let mut engine = SimulationEngine::new(&config, 1, 0).unwrap();
        engine
            .scheduler
            .schedule(Event {
                time: 0.5,
                kind: EventKind::ServiceCompletion,
                target: None,
            })
            .unwrap();

        assert_eq!(
            engine.step(),
            Err(SimulationError::UntargetedEvent {
                kind: EventKind::ServiceCompletion
            })
        );
    }
}
