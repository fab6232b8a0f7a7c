//! Per-replication statistics
//!
//! Time-weighted quantities use area-under-the-curve accounting: the state
//! is held constant between consecutive event times, and the engine
//! integrates it just before applying each event.

use super::attraction::{AdmissionOutcome, AttractionNode};
use super::types::{ArrivalOrigin, NodeIndex};
use serde::{Deserialize, Serialize};

/// Counters and integrals for one attraction
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeStatistics {
    /// Minutes the server was occupied over the whole run
    pub busy_time: f64,
    /// Minutes the server was occupied before closing time
    pub busy_time_while_open: f64,
    /// Integral of the queue length over time
    pub area_queue_length: f64,
    /// Arrival attempts, exogenous and routed
    pub arrivals_generated: u64,
    pub exogenous_arrivals: u64,
    pub routed_arrivals: u64,
    pub admitted: u64,
    pub blocked: u64,
    /// Tourists removed from the queue at closing time
    pub left_at_close: u64,
    pub services_completed: u64,
}

/// Responses of a single replication
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicationResponses {
    /// Tourists lost because a queue was full
    pub total_departed: u64,
    pub percent_departed: f64,
    pub average_number_in_system: f64,
    pub attraction_utilization_percentages: Vec<f64>,
    pub total_arrivals: u64,
    pub total_left_at_close: u64,
    pub clock_at_termination: f64,
    pub nodes: Vec<NodeStatistics>,
}

pub struct StatisticsAccumulator {
    nodes: Vec<NodeStatistics>,
    area_total_occupancy: f64,
    last_update: f64,
    time_open: f64,
}

impl StatisticsAccumulator {
    pub fn new(number_attractions: usize, time_open: f64) -> Self {
        Self {
            nodes: vec![NodeStatistics::default(); number_attractions],
            area_total_occupancy: 0.0,
            last_update: 0.0,
            time_open,
        }
    }

    /// Integrate the current node state over `[last_update, now]`
    pub fn integrate(&mut self, now: f64, attractions: &[AttractionNode]) {
        let elapsed = now - self.last_update;
        if elapsed <= 0.0 {
            return;
        }
        let open_elapsed = (now.min(self.time_open) - self.last_update).max(0.0);

        let mut occupancy = 0u64;
        for (stats, node) in self.nodes.iter_mut().zip(attractions) {
            if node.server_busy() {
                stats.busy_time += elapsed;
                stats.busy_time_while_open += open_elapsed;
            }
            stats.area_queue_length += f64::from(node.queue_length()) * elapsed;
            occupancy += u64::from(node.occupancy());
        }
        self.area_total_occupancy += occupancy as f64 * elapsed;
        self.last_update = now;
    }

    pub fn record_arrival(
        &mut self,
        node: NodeIndex,
        origin: ArrivalOrigin,
        outcome: AdmissionOutcome,
    ) {
        let stats = &mut self.nodes[node];
        stats.arrivals_generated += 1;
        match origin {
            ArrivalOrigin::External => stats.exogenous_arrivals += 1,
            ArrivalOrigin::RoutedFrom(_) => stats.routed_arrivals += 1,
        }
        match outcome {
            AdmissionOutcome::Blocked => stats.blocked += 1,
            AdmissionOutcome::EnteredService | AdmissionOutcome::Queued => stats.admitted += 1,
        }
    }

    pub fn record_completion(&mut self, node: NodeIndex) {
        self.nodes[node].services_completed += 1;
    }

    pub fn record_closing_drain(&mut self, node: NodeIndex, left: u32) {
        self.nodes[node].left_at_close += u64::from(left);
    }

    pub fn node(&self, node: NodeIndex) -> &NodeStatistics {
        &self.nodes[node]
    }

    pub fn nodes(&self) -> &[NodeStatistics] {
        &self.nodes
    }

    pub fn area_total_occupancy(&self) -> f64 {
        self.area_total_occupancy
    }

    pub fn total_arrivals(&self) -> u64 {
        self.nodes.iter().map(|s| s.arrivals_generated).sum()
    }

    pub fn total_blocked(&self) -> u64 {
        self.nodes.iter().map(|s| s.blocked).sum()
    }

    pub fn total_left_at_close(&self) -> u64 {
        self.nodes.iter().map(|s| s.left_at_close).sum()
    }

    /// Derive the replication responses once the event queue is empty
    pub fn into_responses(self, clock_at_termination: f64) -> ReplicationResponses {
        let total_departed = self.total_blocked();
        let total_arrivals = self.total_arrivals();
        let percent_departed = if total_arrivals == 0 {
            0.0
        } else {
            total_departed as f64 / total_arrivals as f64
        };
        let average_number_in_system = if clock_at_termination > 0.0 {
            self.area_total_occupancy / clock_at_termination
        } else {
            0.0
        };
        let attraction_utilization_percentages = self
            .nodes
            .iter()
            .map(|s| {
                if self.time_open > 0.0 {
                    s.busy_time_while_open / self.time_open
                } else {
                    0.0
                }
            })
            .collect();

        ReplicationResponses {
            total_departed,
            percent_departed,
            average_number_in_system,
            attraction_utilization_percentages,
            total_arrivals,
            total_left_at_close: self.total_left_at_close(),
            clock_at_termination,
            nodes: self.nodes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrates_piecewise_constant_state() {
        let mut nodes = vec![AttractionNode::new(3), AttractionNode::new(3)];
        let mut acc = StatisticsAccumulator::new(2, 100.0);

        acc.integrate(2.0, &nodes); // everything idle for 2 minutes
        nodes[0].admit();
        nodes[0].admit();
        acc.integrate(5.0, &nodes); // node 0: busy + 1 waiting for 3 minutes

        let stats = acc.node(0);
        assert_eq!(stats.busy_time, 3.0);
        assert_eq!(stats.area_queue_length, 3.0);
        assert_eq!(acc.node(1).busy_time, 0.0);
        assert_eq!(acc.area_total_occupancy(), 6.0);
    }

    #[test]
    fn test_busy_time_while_open_is_clipped_at_closing() {
        let mut nodes = vec![AttractionNode::new(0)];
        nodes[0].admit();
        let mut acc = StatisticsAccumulator::new(1, 10.0);

        acc.integrate(8.0, &nodes);
        acc.integrate(15.0, &nodes);

        let stats = acc.node(0);
        assert_eq!(stats.busy_time, 15.0);
        assert_eq!(stats.busy_time_while_open, 10.0);

        let responses = acc.into_responses(15.0);
        assert_eq!(responses.attraction_utilization_percentages, vec![1.0]);
        assert_eq!(responses.average_number_in_system, 1.0);
    }

    #[test]
    fn test_arrival_bookkeeping() {
        let mut acc = StatisticsAccumulator::new(2, 10.0);
        acc.record_arrival(0, ArrivalOrigin::External, AdmissionOutcome::EnteredService);
        acc.record_arrival(0, ArrivalOrigin::RoutedFrom(1), AdmissionOutcome::Queued);
        acc.record_arrival(0, ArrivalOrigin::External, AdmissionOutcome::Blocked);
        acc.record_closing_drain(0, 1);

        let stats = acc.node(0);
        assert_eq!(stats.arrivals_generated, 3);
        assert_eq!(stats.exogenous_arrivals, 2);
        assert_eq!(stats.routed_arrivals, 1);
        assert_eq!(stats.admitted + stats.blocked, stats.arrivals_generated);

        let responses = acc.into_responses(10.0);
        assert_eq!(responses.total_departed, 1);
        assert_eq!(responses.total_left_at_close, 1);
        assert!((responses.percent_departed - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_run_responses_are_zero() {
        let acc = StatisticsAccumulator::new(3, 0.0);
        let responses = acc.into_responses(0.0);
        assert_eq!(responses.total_departed, 0);
        assert_eq!(responses.percent_departed, 0.0);
        assert_eq!(responses.average_number_in_system, 0.0);
        assert_eq!(responses.attraction_utilization_percentages, vec![0.0; 3]);
    }
}
