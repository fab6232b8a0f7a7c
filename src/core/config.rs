//! Park model configuration
//!
//! A `ParkConfig` fully describes one park: how many attractions it has,
//! how long it stays open, how the waiting-room capacity is split, and the
//! arrival, service and routing distributions of every attraction.
//!
//! Times are in minutes and all rates are per minute. The default Erlang
//! rate of 1/9 per minute gives a mean service time of 18 minutes for the
//! default shape of 2.

use super::errors::ConfigError;
use serde::{Deserialize, Serialize};

/// Tolerance used when checking that a routing row sums to one
pub const ROUTING_TOLERANCE: f64 = 1e-6;

const DEFAULT_ATTRACTIONS: usize = 7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParkConfig {
    pub number_attractions: usize,
    /// Minutes the park accepts new visitors
    pub time_open: f64,
    /// Total waiting-room capacity shared by all attractions
    pub park_capacity: u32,
    pub queue_capacities: Vec<u32>,
    /// Poisson rate of exogenous arrivals per attraction
    pub arrival_gammas: Vec<f64>,
    pub erlang_shape: Vec<u32>,
    pub erlang_rate: Vec<f64>,
    /// Probability of leaving the park after each attraction
    pub depart_probabilities: Vec<f64>,
    /// `transition_probabilities[i][j]` is the probability of moving from i to j
    pub transition_probabilities: Vec<Vec<f64>>,
}

impl Default for ParkConfig {
    fn default() -> Self {
        let n = DEFAULT_ATTRACTIONS;
        let transition_probabilities = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| if i + j == n - 1 { 0.2 } else { 0.1 })
                    .collect()
            })
            .collect();

        Self {
            number_attractions: n,
            time_open: 480.0,
            park_capacity: 350,
            queue_capacities: vec![50; n],
            arrival_gammas: vec![1.0; n],
            erlang_shape: vec![2; n],
            erlang_rate: vec![1.0 / 9.0; n],
            depart_probabilities: vec![0.2; n],
            transition_probabilities,
        }
    }
}

impl ParkConfig {
    /// Create the default seven-attraction park
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a park of `n` identical attractions.
    ///
    /// Capacity is split as evenly as possible (earlier attractions receive
    /// the remainder) and tourists who stay are routed uniformly.
    pub fn uniform(n: usize, park_capacity: u32) -> Self {
        let depart = 0.2;
        let move_probability = if n == 0 { 0.0 } else { (1.0 - depart) / n as f64 };
        let share = if n == 0 { 0 } else { park_capacity / n as u32 };
        let remainder = if n == 0 { 0 } else { park_capacity as usize % n };
        let queue_capacities = (0..n)
            .map(|i| share + u32::from(i < remainder))
            .collect();

        Self {
            number_attractions: n,
            time_open: 480.0,
            park_capacity,
            queue_capacities,
            arrival_gammas: vec![1.0; n],
            erlang_shape: vec![2; n],
            erlang_rate: vec![1.0 / 9.0; n],
            depart_probabilities: vec![depart; n],
            transition_probabilities: vec![vec![move_probability; n]; n],
        }
    }

    pub fn with_time_open(mut self, minutes: f64) -> Self {
        self.time_open = minutes;
        self
    }

    /// Replace the capacity partition; the park capacity follows the new sum
    pub fn with_queue_capacities(mut self, capacities: Vec<u32>) -> Self {
        self.park_capacity = capacities.iter().sum();
        self.queue_capacities = capacities;
        self
    }

    pub fn with_arrival_gammas(mut self, gammas: Vec<f64>) -> Self {
        self.arrival_gammas = gammas;
        self
    }

    pub fn with_service(mut self, shapes: Vec<u32>, rates: Vec<f64>) -> Self {
        self.erlang_shape = shapes;
        self.erlang_rate = rates;
        self
    }

    pub fn with_routing(mut self, depart: Vec<f64>, transitions: Vec<Vec<f64>>) -> Self {
        self.depart_probabilities = depart;
        self.transition_probabilities = transitions;
        self
    }

    /// Routing row of attraction `node`: N move probabilities followed by the
    /// depart probability.
    pub fn routing_row(&self, node: usize) -> Vec<f64> {
        let mut row = self.transition_probabilities[node].clone();
        row.push(self.depart_probabilities[node]);
        row
    }

    /// Check every factor and their cross-consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        let n = self.number_attractions;
        if n == 0 {
            return Err(ConfigError::NoAttractions);
        }

        check_len("queue_capacities", n, self.queue_capacities.len())?;
        check_len("arrival_gammas", n, self.arrival_gammas.len())?;
        check_len("erlang_shape", n, self.erlang_shape.len())?;
        check_len("erlang_rate", n, self.erlang_rate.len())?;
        check_len("depart_probabilities", n, self.depart_probabilities.len())?;
        check_len(
            "transition_probabilities",
            n,
            self.transition_probabilities.len(),
        )?;
        for row in &self.transition_probabilities {
            check_len("transition_probabilities row", n, row.len())?;
        }

        if !self.time_open.is_finite() || self.time_open < 0.0 {
            return Err(ConfigError::InvalidTimeOpen(self.time_open));
        }

        let sum: u64 = self.queue_capacities.iter().map(|&c| u64::from(c)).sum();
        if sum != u64::from(self.park_capacity) {
            return Err(ConfigError::CapacityBudgetMismatch {
                sum,
                park_capacity: u64::from(self.park_capacity),
            });
        }

        for (index, &value) in self.arrival_gammas.iter().enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidRate {
                    factor: "arrival_gammas",
                    index,
                    value,
                });
            }
        }

        for (index, &value) in self.erlang_rate.iter().enumerate() {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidRate {
                    factor: "erlang_rate",
                    index,
                    value,
                });
            }
            if value == 0.0 {
                return Err(ConfigError::NonPositiveServiceRate { index, value });
            }
        }

        if let Some(index) = self.erlang_shape.iter().position(|&k| k == 0) {
            return Err(ConfigError::ZeroErlangShape { index });
        }

        for row in 0..n {
            let entries = self.routing_row(row);
            for (column, &value) in entries.iter().enumerate() {
                if !(0.0..=1.0).contains(&value) {
                    return Err(ConfigError::InvalidProbability { row, column, value });
                }
            }
            let sum: f64 = entries.iter().sum();
            if (sum - 1.0).abs() > ROUTING_TOLERANCE {
                return Err(ConfigError::RoutingRowSum { row, sum });
            }
        }

        Ok(())
    }
}

fn check_len(factor: &'static str, expected: usize, actual: usize) -> Result<(), ConfigError> {
    if expected != actual {
        return Err(ConfigError::LengthMismatch {
            factor,
            expected,
            actual,
        });
    }
    Ok(())
}
