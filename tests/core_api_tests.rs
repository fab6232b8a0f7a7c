use parksim::{
    CapacityPartitionProblem, ConfigError, ParkConfig, ProblemConfig, ProblemError,
    ReplicationRunner, RunnerConfig, SimulationEngine,
};

/// End-to-end run of the default seven-attraction park
#[test]
fn test_default_park_responses_in_range() {
    let runner = ReplicationRunner::new(ParkConfig::default(), RunnerConfig::new()).unwrap();
    let responses = runner.run_responses(12345, 0..100).unwrap();
    assert_eq!(responses.len(), 100);

    for replication in &responses {
        assert!((0.0..=1.0).contains(&replication.percent_departed));
        assert!(replication.average_number_in_system > 0.0);
        assert!(replication.average_number_in_system < 357.0);
        assert!(replication.clock_at_termination >= 480.0);
        for &utilization in &replication.attraction_utilization_percentages {
            assert!((0.0..=1.0 + 1e-9).contains(&utilization));
        }
        assert_eq!(
            CapacityPartitionProblem::response_to_objective(replication),
            replication.total_departed as f64
        );
    }

    let summary = runner.run(100, 12345).unwrap();
    let mean_departed: f64 =
        responses.iter().map(|r| r.total_departed as f64).sum::<f64>() / 100.0;
    assert!((summary.total_departed.mean() - mean_departed).abs() < 1e-9);
}

#[test]
fn test_more_capacity_blocks_fewer_tourists() {
    let base = ParkConfig::uniform(3, 30).with_time_open(240.0);
    let tight = base.clone().with_queue_capacities(vec![2, 18, 10]);
    let roomy = base.with_queue_capacities(vec![12, 8, 10]);

    let mean_blocked_at_first = |config: &ParkConfig| {
        let runner = ReplicationRunner::new(config.clone(), RunnerConfig::new()).unwrap();
        let responses = runner.run_responses(2024, 0..50).unwrap();
        responses.iter().map(|r| r.nodes[0].blocked as f64).sum::<f64>() / 50.0
    };

    let tight_blocked = mean_blocked_at_first(&tight);
    let roomy_blocked = mean_blocked_at_first(&roomy);
    assert!(
        roomy_blocked <= tight_blocked + 1.0,
        "roomy {} vs tight {}",
        roomy_blocked,
        tight_blocked
    );
}

#[test]
fn test_engine_and_runner_agree() {
    let config = ParkConfig::uniform(4, 20).with_time_open(120.0);
    let runner = ReplicationRunner::new(config.clone(), RunnerConfig::new()).unwrap();
    let direct = SimulationEngine::new(&config, 8, 2).unwrap().run().unwrap();
    assert_eq!(runner.run_replication(8, 2).unwrap(), direct);
}

#[test]
fn test_partial_json_config_uses_defaults() {
    let json = r#"{ "time_open": 240.0, "arrival_gammas": [2, 1, 1, 1, 1, 1, 0.5] }"#;
    let config: ParkConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.time_open, 240.0);
    assert_eq!(config.arrival_gammas[6], 0.5);
    assert_eq!(config.number_attractions, 7);
    assert_eq!(config.queue_capacities, vec![50; 7]);
    assert!(config.validate().is_ok());
}

#[test]
fn test_json_config_validation_errors() {
    let json = r#"{ "queue_capacities": [50, 50, 50, 50, 50, 50, 49] }"#;
    let config: ParkConfig = serde_json::from_str(json).unwrap();
    assert_eq!(
        config.validate(),
        Err(ConfigError::CapacityBudgetMismatch {
            sum: 349,
            park_capacity: 350
        })
    );
}

#[test]
fn test_problem_evaluation_through_public_api() {
    let model = ParkConfig::uniform(3, 15).with_time_open(90.0);
    let factors = ProblemConfig {
        budget: 8,
        replications_per_evaluation: 4,
        ..ProblemConfig::default()
    };
    let mut problem = CapacityPartitionProblem::new("PARK-SMALL", model, factors).unwrap();
    assert_eq!(problem.initial_solution(), &[5, 5, 5]);

    let estimate = problem.evaluate(&[5, 5, 5]).unwrap().unwrap();
    assert_eq!(estimate.replications, 4);
    assert_eq!(estimate.summary.replications, 4);
    assert_eq!(estimate.mean, estimate.summary.total_departed.mean());

    assert!(matches!(
        problem.evaluate(&[5, 5]),
        Err(ProblemError::WrongDimension {
            expected: 3,
            actual: 2
        })
    ));
    assert!(problem.evaluate(&[15, 0, 0]).unwrap().is_some());
    assert_eq!(problem.evaluate(&[0, 0, 15]).unwrap(), None);
    assert_eq!(problem.replications_used(), 8);
}

#[test]
fn test_problem_rejects_invalid_model() {
    let mut model = ParkConfig::default();
    model.depart_probabilities[3] = 0.5;
    assert!(matches!(
        CapacityPartitionProblem::new("broken", model, ProblemConfig::default()),
        Err(ProblemError::InvalidModel(ConfigError::RoutingRowSum { row: 3, .. }))
    ));
}
