// Tests for ReplicationRunner functionality
#[cfg(test)]
mod tests {
    use crate::core::{
        config::ParkConfig,
        errors::SimulationError,
        execution::config::{ConcurrencyMode, RunnerConfig},
        execution::replication::ReplicationRunner,
    };

    fn small_park() -> ParkConfig {
        ParkConfig::uniform(3, 9).with_time_open(90.0)
    }

    #[test]
    fn test_sequential_and_rayon_summaries_identical() {
        let sequential = ReplicationRunner::new(small_park(), RunnerConfig::new()).unwrap();
        let parallel = ReplicationRunner::new(
            small_park(),
            RunnerConfig::new().with_concurrency(ConcurrencyMode::Rayon),
        )
        .unwrap();
        let pooled = ReplicationRunner::new(
            small_park(),
            RunnerConfig::new()
                .with_concurrency(ConcurrencyMode::Rayon)
                .with_thread_pool_size(3),
        )
        .unwrap();

        let expected = sequential.run(24, 99).unwrap();
        assert_eq!(expected.replications, 24);
        assert_eq!(parallel.run(24, 99).unwrap(), expected);
        assert_eq!(pooled.run(24, 99).unwrap(), expected);
    }

    #[test]
    fn test_responses_come_back_in_replication_order() {
        let runner = ReplicationRunner::new(
            small_park(),
            RunnerConfig::new().with_concurrency(ConcurrencyMode::Rayon),
        )
        .unwrap();
        let responses = runner.run_responses(5, 10..16).unwrap();
        assert_eq!(responses.len(), 6);
        for (offset, replication) in responses.iter().enumerate() {
            let single = runner.run_replication(5, 10 + offset as u64).unwrap();
            assert_eq!(replication, &single);
        }
    }

    #[test]
    fn test_split_ranges_merge_to_full_summary() {
        let runner = ReplicationRunner::new(small_park(), RunnerConfig::new()).unwrap();
        let whole = runner.run(20, 3).unwrap();
        let mut first = runner.run_range(3, 0..8).unwrap();
        let second = runner.run_range(3, 8..20).unwrap();
        first.merge(&second);

        assert_eq!(first.replications, whole.replications);
        assert!((first.total_departed.mean() - whole.total_departed.mean()).abs() < 1e-9);
        assert!(
            (first.total_departed.variance() - whole.total_departed.variance()).abs() < 1e-6
        );
        for (merged, direct) in first
            .attraction_utilization_percentages
            .iter()
            .zip(&whole.attraction_utilization_percentages)
        {
            assert!((merged.mean() - direct.mean()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_empty_range_gives_empty_summary() {
        let runner = ReplicationRunner::new(small_park(), RunnerConfig::new()).unwrap();
        let summary = runner.run(0, 1).unwrap();
        assert_eq!(summary.replications, 0);
        assert_eq!(summary.total_departed.count(), 0);
        assert_eq!(summary.attraction_utilization_percentages.len(), 3);
    }

    #[test]
    fn test_runner_rejects_invalid_config() {
        let mut config = small_park();
        config.park_capacity = 10;
        assert!(matches!(
            ReplicationRunner::new(config, RunnerConfig::new()),
            Err(SimulationError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_zero_thread_pool_uses_default_threads() {
        // rayon treats a zero thread count as "choose automatically"
        let runner = ReplicationRunner::new(
            small_park(),
            RunnerConfig::new()
                .with_concurrency(ConcurrencyMode::Rayon)
                .with_thread_pool_size(0),
        )
        .unwrap();
        assert_eq!(runner.run(4, 1).unwrap().replications, 4);
    }
}
