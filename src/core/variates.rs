//! Random-variate generation for one replication
//!
//! Every attraction owns three independent streams: exogenous
//! interarrival times, service durations and routing decisions. Each stream
//! is seeded from `(seed, replication, stream kind, attraction)` only, so
//! two configurations simulated with the same seed and replication index
//! consume identical random numbers for identical purposes (common random
//! numbers). Changing a queue capacity never shifts another stream.

use super::config::ParkConfig;
use super::errors::SimulationError;
use super::types::{NodeIndex, RoutingDecision};
use rand::distributions::WeightedIndex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Exp};

/// The three stream families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    Arrivals,
    Service,
    Routing,
}

impl StreamKind {
    fn tag(self) -> u64 {
        match self {
            StreamKind::Arrivals => 1,
            StreamKind::Service => 2,
            StreamKind::Routing => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StreamKind::Arrivals => "arrival",
            StreamKind::Service => "service",
            StreamKind::Routing => "routing",
        }
    }
}

/// SplitMix64 finalizer
fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Seed of one (replication, stream, attraction) substream
pub fn derive_seed(seed: u64, replication: u64, kind: StreamKind, node: NodeIndex) -> u64 {
    let mut state = mix64(seed);
    for part in [replication, kind.tag(), node as u64] {
        state = mix64(state ^ part.wrapping_add(0x9E37_79B9_7F4A_7C15));
    }
    state
}

struct NodeStreams {
    arrival_rng: StdRng,
    service_rng: StdRng,
    routing_rng: StdRng,
    /// `None` when the attraction has no exogenous arrivals
    interarrival: Option<Exp<f64>>,
    service_stage: Exp<f64>,
    service_shape: u32,
    routing: WeightedIndex<f64>,
}

pub struct RandomVariateSource {
    nodes: Vec<NodeStreams>,
}

impl RandomVariateSource {
    /// Build the streams of replication `replication` for a validated config
    pub fn new(config: &ParkConfig, seed: u64, replication: u64) -> Result<Self, SimulationError> {
        let n = config.number_attractions;
        let mut nodes = Vec::with_capacity(n);

        for node in 0..n {
            let gamma = config.arrival_gammas[node];
            let interarrival = if gamma > 0.0 {
                Some(Exp::new(gamma).map_err(|e| SimulationError::Distribution {
                    node,
                    reason: e.to_string(),
                })?)
            } else {
                None
            };

            let service_stage =
                Exp::new(config.erlang_rate[node]).map_err(|e| SimulationError::Distribution {
                    node,
                    reason: e.to_string(),
                })?;

            // Targets 0..n then "depart" at index n
            let routing = WeightedIndex::new(config.routing_row(node)).map_err(|e| {
                SimulationError::Distribution {
                    node,
                    reason: e.to_string(),
                }
            })?;

            let rng_for = |kind| StdRng::seed_from_u64(derive_seed(seed, replication, kind, node));
            nodes.push(NodeStreams {
                arrival_rng: rng_for(StreamKind::Arrivals),
                service_rng: rng_for(StreamKind::Service),
                routing_rng: rng_for(StreamKind::Routing),
                interarrival,
                service_stage,
                service_shape: config.erlang_shape[node],
                routing,
            });
        }

        Ok(Self { nodes })
    }

    pub fn has_exogenous_arrivals(&self, node: NodeIndex) -> bool {
        self.nodes[node].interarrival.is_some()
    }

    /// Time until the next exogenous arrival; infinite when the attraction
    /// has no exogenous arrivals
    pub fn next_interarrival(&mut self, node: NodeIndex) -> Result<f64, SimulationError> {
        let streams = &mut self.nodes[node];
        let value = match &streams.interarrival {
            Some(exp) => exp.sample(&mut streams.arrival_rng),
            None => return Ok(f64::INFINITY),
        };
        check_variate(StreamKind::Arrivals, node, value)
    }

    /// Erlang(k, λ) service duration as the sum of k exponential stages
    pub fn next_service_duration(&mut self, node: NodeIndex) -> Result<f64, SimulationError> {
        let streams = &mut self.nodes[node];
        let value: f64 = (0..streams.service_shape)
            .map(|_| streams.service_stage.sample(&mut streams.service_rng))
            .sum();
        check_variate(StreamKind::Service, node, value)
    }

    pub fn next_routing_decision(&mut self, node: NodeIndex) -> RoutingDecision {
        let streams = &mut self.nodes[node];
        let outcome = streams.routing.sample(&mut streams.routing_rng);
        if outcome == self.nodes.len() {
            RoutingDecision::Depart
        } else {
            RoutingDecision::To(outcome)
        }
    }
}

fn check_variate(kind: StreamKind, node: NodeIndex, value: f64) -> Result<f64, SimulationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(SimulationError::InvalidVariate {
            stream: kind.name(),
            node,
            value,
        })
    }
}
