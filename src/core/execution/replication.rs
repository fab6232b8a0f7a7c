//! Independent replications and their aggregation
//!
//! Each replication builds its own engine, variate streams and statistics,
//! so replications can run on any thread. Results are collected in
//! replication order and folded in that order, which makes a summary a pure
//! function of `(configuration, replication range, seed)` no matter how
//! many threads produced it.

use super::config::{ConcurrencyMode, RunnerConfig};
use super::simulation_engine::SimulationEngine;
use crate::core::config::ParkConfig;
use crate::core::errors::SimulationError;
use crate::core::statistics::ReplicationResponses;
use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Two-sided 95% normal quantile
pub const Z_95: f64 = 1.959_963_984_540_054;

/// Running mean and variance of one response (Welford)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleStatistic {
    count: u64,
    mean: f64,
    m2: f64,
}

impl SampleStatistic {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    /// Combine with a statistic computed over disjoint observations
    pub fn merge(&mut self, other: &SampleStatistic) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = *other;
            return;
        }
        let count = self.count + other.count;
        let delta = other.mean - self.mean;
        let weight = other.count as f64 / count as f64;
        self.m2 += other.m2 + delta * delta * self.count as f64 * weight;
        self.mean += delta * weight;
        self.count = count;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Unbiased sample variance; zero with fewer than two observations
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_error(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            (self.variance() / self.count as f64).sqrt()
        }
    }

    /// Half-width of a normal-approximation confidence interval
    pub fn half_width(&self, z: f64) -> f64 {
        z * self.std_error()
    }
}

/// Sample statistics of every response across replications
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseSummary {
    pub replications: u64,
    pub total_departed: SampleStatistic,
    pub percent_departed: SampleStatistic,
    pub average_number_in_system: SampleStatistic,
    pub attraction_utilization_percentages: Vec<SampleStatistic>,
    pub total_left_at_close: SampleStatistic,
}

impl ResponseSummary {
    pub fn new(number_attractions: usize) -> Self {
        Self {
            attraction_utilization_percentages: vec![SampleStatistic::new(); number_attractions],
            ..Self::default()
        }
    }

    pub fn push(&mut self, responses: &ReplicationResponses) {
        self.replications += 1;
        self.total_departed.push(responses.total_departed as f64);
        self.percent_departed.push(responses.percent_departed);
        self.average_number_in_system
            .push(responses.average_number_in_system);
        self.total_left_at_close
            .push(responses.total_left_at_close as f64);
        for (stat, &value) in self
            .attraction_utilization_percentages
            .iter_mut()
            .zip(&responses.attraction_utilization_percentages)
        {
            stat.push(value);
        }
    }

    pub fn merge(&mut self, other: &ResponseSummary) {
        self.replications += other.replications;
        self.total_departed.merge(&other.total_departed);
        self.percent_departed.merge(&other.percent_departed);
        self.average_number_in_system
            .merge(&other.average_number_in_system);
        self.total_left_at_close.merge(&other.total_left_at_close);
        for (stat, theirs) in self
            .attraction_utilization_percentages
            .iter_mut()
            .zip(&other.attraction_utilization_percentages)
        {
            stat.merge(theirs);
        }
    }
}

/// Runs replications of one park configuration
pub struct ReplicationRunner {
    config: ParkConfig,
    runner_config: RunnerConfig,
}

impl ReplicationRunner {
    /// Validates the configuration once, up front
    pub fn new(config: ParkConfig, runner_config: RunnerConfig) -> Result<Self, SimulationError> {
        config.validate()?;
        Ok(Self {
            config,
            runner_config,
        })
    }

    pub fn config(&self) -> &ParkConfig {
        &self.config
    }

    /// Run replications `0..replications` and summarize them
    pub fn run(&self, replications: u64, seed: u64) -> Result<ResponseSummary, SimulationError> {
        self.run_range(seed, 0..replications)
    }

    /// Run the replications with the given indices and summarize them
    pub fn run_range(
        &self,
        seed: u64,
        range: Range<u64>,
    ) -> Result<ResponseSummary, SimulationError> {
        let responses = self.run_responses(seed, range.clone())?;
        let mut summary = ResponseSummary::new(self.config.number_attractions);
        for replication in &responses {
            summary.push(replication);
        }

        info!(
            "Replications {:?} (seed {}): mean departed {:.2} ± {:.2}, mean in system {:.2}",
            range,
            seed,
            summary.total_departed.mean(),
            summary.total_departed.half_width(Z_95),
            summary.average_number_in_system.mean()
        );
        Ok(summary)
    }

    /// Per-replication responses, in replication order
    pub fn run_responses(
        &self,
        seed: u64,
        range: Range<u64>,
    ) -> Result<Vec<ReplicationResponses>, SimulationError> {
        let start = range.start;
        let count = replication_count(&range)?;
        debug!(
            "Running {} replications from index {} ({:?})",
            count, start, self.runner_config.concurrency_mode
        );

        match self.runner_config.concurrency_mode {
            ConcurrencyMode::Sequential => range
                .map(|index| self.run_replication(seed, index))
                .collect(),
            ConcurrencyMode::Rayon => {
                let collect = || {
                    (0..count)
                        .into_par_iter()
                        .map(|offset| self.run_replication(seed, start + offset as u64))
                        .collect::<Result<Vec<_>, _>>()
                };
                match self.runner_config.thread_pool_size {
                    Some(threads) => rayon::ThreadPoolBuilder::new()
                        .num_threads(threads)
                        .build()
                        .map_err(|e| SimulationError::ThreadPool(e.to_string()))?
                        .install(collect),
                    None => collect(),
                }
            }
        }
    }

    /// Run a single replication
    pub fn run_replication(
        &self,
        seed: u64,
        replication: u64,
    ) -> Result<ReplicationResponses, SimulationError> {
        SimulationEngine::new(&self.config, seed, replication)?.run()
    }
}

/// Number of replications in `range`; empty when `start >= end`
fn replication_count(range: &Range<u64>) -> Result<usize, SimulationError> {
    usize::try_from(range.end.saturating_sub(range.start)).map_err(|_| {
        SimulationError::ReplicationRange {
            start: range.start,
            end: range.end,
        }
    })
}
