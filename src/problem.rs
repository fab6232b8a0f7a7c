//! Capacity-partition optimization problem
//!
//! Exposes the park simulator as a black-box objective for an external
//! search procedure. A decision vector assigns waiting-room capacity to
//! every attraction; it is feasible when all entries are non-negative and
//! they sum exactly to the park capacity. The objective is the expected
//! number of tourists lost to full queues, to be minimized.
//!
//! Decision vectors are signed so that candidates produced by a solver's
//! arithmetic can be checked rather than silently wrapped.

use crate::core::config::ParkConfig;
use crate::core::errors::{ConfigError, SimulationError};
use crate::core::execution::{ReplicationRunner, ResponseSummary, RunnerConfig};
use crate::core::statistics::ReplicationResponses;
use log::{debug, info};
use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProblemError {
    #[error("decision vector has {actual} entries, problem dimension is {expected}")]
    WrongDimension { expected: usize, actual: usize },

    #[error("capacity for attraction {index} is negative ({value})")]
    NegativeCapacity { index: usize, value: i64 },

    #[error("capacities sum to {sum}, park capacity is {park_capacity}")]
    CapacitySum { sum: i64, park_capacity: i64 },

    #[error("capacities overflow when summed, park capacity is {park_capacity}")]
    CapacityOverflow { park_capacity: i64 },

    #[error("replications_per_evaluation must be at least 1")]
    ZeroReplicationsPerEvaluation,

    #[error("invalid park model: {0}")]
    InvalidModel(#[from] ConfigError),

    #[error("simulation failed: {0}")]
    Simulation(#[from] SimulationError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectiveSense {
    Minimize,
    Maximize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConstraintType {
    Unconstrained,
    BoxConstrained,
    Deterministic,
    Stochastic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariableType {
    Discrete,
    Continuous,
    Mixed,
}

/// Problem-level factors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProblemConfig {
    /// Maximum number of replications a solver may spend
    pub budget: u64,
    pub replications_per_evaluation: u64,
    /// Starting point for solvers; defaults to the model's capacities
    pub initial_solution: Option<Vec<i64>>,
    pub seed: u64,
    /// Reuse replication indices (common random numbers) for every candidate
    pub crn_across_solutions: bool,
}

impl Default for ProblemConfig {
    fn default() -> Self {
        Self {
            budget: 1000,
            replications_per_evaluation: 10,
            initial_solution: None,
            seed: 12345,
            crn_across_solutions: true,
        }
    }
}

/// Objective estimate for one candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveEstimate {
    /// Mean of `total_departed` across the replications run
    pub mean: f64,
    pub variance: f64,
    pub std_error: f64,
    pub replications: u64,
    pub summary: ResponseSummary,
}

pub struct CapacityPartitionProblem {
    name: String,
    model: ParkConfig,
    factors: ProblemConfig,
    runner_config: RunnerConfig,
    initial_solution: Vec<i64>,
    replications_used: u64,
}

impl CapacityPartitionProblem {
    pub fn new(
        name: impl Into<String>,
        model: ParkConfig,
        factors: ProblemConfig,
    ) -> Result<Self, ProblemError> {
        model.validate()?;
        if factors.replications_per_evaluation == 0 {
            return Err(ProblemError::ZeroReplicationsPerEvaluation);
        }
        let mut problem = Self {
            name: name.into(),
            initial_solution: Vec::new(),
            model,
            factors,
            runner_config: RunnerConfig::default(),
            replications_used: 0,
        };

        let initial = match &problem.factors.initial_solution {
            Some(solution) => solution.clone(),
            None => problem
                .model
                .queue_capacities
                .iter()
                .map(|&c| i64::from(c))
                .collect(),
        };
        problem.check_feasible(&initial)?;
        problem.initial_solution = initial;
        Ok(problem)
    }

    /// The standard problem over the default seven-attraction park
    pub fn with_defaults() -> Result<Self, ProblemError> {
        Self::new("PARK-1", ParkConfig::default(), ProblemConfig::default())
    }

    pub fn with_runner_config(mut self, runner_config: RunnerConfig) -> Self {
        self.runner_config = runner_config;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dim(&self) -> usize {
        self.model.number_attractions
    }

    pub fn sense(&self) -> ObjectiveSense {
        ObjectiveSense::Minimize
    }

    pub fn constraint_type(&self) -> ConstraintType {
        ConstraintType::Deterministic
    }

    pub fn variable_type(&self) -> VariableType {
        VariableType::Discrete
    }

    pub fn lower_bounds(&self) -> Vec<i64> {
        vec![0; self.dim()]
    }

    pub fn upper_bounds(&self) -> Vec<i64> {
        vec![self.park_capacity(); self.dim()]
    }

    pub fn park_capacity(&self) -> i64 {
        i64::from(self.model.park_capacity)
    }

    pub fn initial_solution(&self) -> &[i64] {
        &self.initial_solution
    }

    pub fn model(&self) -> &ParkConfig {
        &self.model
    }

    pub fn budget(&self) -> u64 {
        self.factors.budget
    }

    pub fn replications_per_evaluation(&self) -> u64 {
        self.factors.replications_per_evaluation
    }

    pub fn replications_used(&self) -> u64 {
        self.replications_used
    }

    pub fn budget_remaining(&self) -> u64 {
        self.factors.budget.saturating_sub(self.replications_used)
    }

    /// Explain why `x` is infeasible
    pub fn check_feasible(&self, x: &[i64]) -> Result<(), ProblemError> {
        if x.len() != self.dim() {
            return Err(ProblemError::WrongDimension {
                expected: self.dim(),
                actual: x.len(),
            });
        }
        if let Some((index, &value)) = x.iter().enumerate().find(|(_, &v)| v < 0) {
            return Err(ProblemError::NegativeCapacity { index, value });
        }
        let sum = x
            .iter()
            .try_fold(0i64, |acc, &v| acc.checked_add(v))
            .ok_or(ProblemError::CapacityOverflow {
                park_capacity: self.park_capacity(),
            })?;
        if sum != self.park_capacity() {
            return Err(ProblemError::CapacitySum {
                sum,
                park_capacity: self.park_capacity(),
            });
        }
        Ok(())
    }

    pub fn is_feasible(&self, x: &[i64]) -> bool {
        self.check_feasible(x).is_ok()
    }

    /// Model configuration with the capacities of `x`
    pub fn vector_to_config(&self, x: &[i64]) -> Result<ParkConfig, ProblemError> {
        self.check_feasible(x)?;
        let mut config = self.model.clone();
        // Feasible entries lie in [0, park_capacity], which fits in u32
        config.queue_capacities = x.iter().map(|&v| v as u32).collect();
        Ok(config)
    }

    pub fn config_to_vector(config: &ParkConfig) -> Vec<i64> {
        config.queue_capacities.iter().map(|&c| i64::from(c)).collect()
    }

    pub fn response_to_objective(responses: &ReplicationResponses) -> f64 {
        responses.total_departed as f64
    }

    /// Estimate the objective at `x`.
    ///
    /// Returns `Ok(None)` once the replication budget is spent. Fewer than
    /// `replications_per_evaluation` replications run when the remaining
    /// budget is smaller.
    pub fn evaluate(&mut self, x: &[i64]) -> Result<Option<ObjectiveEstimate>, ProblemError> {
        let config = self.vector_to_config(x)?;

        let remaining = self.budget_remaining();
        if remaining == 0 {
            info!(
                "{}: budget of {} replications exhausted",
                self.name, self.factors.budget
            );
            return Ok(None);
        }
        let replications = self.factors.replications_per_evaluation.min(remaining);
        let range = if self.factors.crn_across_solutions {
            0..replications
        } else {
            self.replications_used..self.replications_used + replications
        };
        debug!("{}: evaluating {:?} with replications {:?}", self.name, x, range);

        let runner = ReplicationRunner::new(config, self.runner_config.clone())?;
        let summary = runner.run_range(self.factors.seed, range)?;
        self.replications_used += replications;

        Ok(Some(ObjectiveEstimate {
            mean: summary.total_departed.mean(),
            variance: summary.total_departed.variance(),
            std_error: summary.total_departed.std_error(),
            replications,
            summary,
        }))
    }

    /// Draw a capacity partition uniformly from all feasible integer vectors
    pub fn sample_random_feasible<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<i64> {
        uniform_composition(rng, self.model.park_capacity as usize, self.dim())
    }
}

/// Uniform draw from the non-negative integer vectors of length `parts`
/// summing to `total` (stars and bars)
pub fn uniform_composition<R: Rng + ?Sized>(rng: &mut R, total: usize, parts: usize) -> Vec<i64> {
    if parts == 0 {
        return Vec::new();
    }
    let slots = total + parts - 1;
    let mut bars = index::sample(rng, slots, parts - 1).into_vec();
    bars.sort_unstable();

    let mut composition = Vec::with_capacity(parts);
    let mut previous: i64 = -1;
    for bar in bars.into_iter().chain(std::iter::once(slots)) {
        composition.push(bar as i64 - previous - 1);
        previous = bar as i64;
    }
    composition
}
