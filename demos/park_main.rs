use parksim::{
    CapacityPartitionProblem, ConcurrencyMode, ParkConfig, ReplicationRunner, RunnerConfig,
};
use parksim::core::execution::replication::Z_95;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp(None)
        .init();

    println!("🎢 Starting Amusement Park Simulation");

    let config = ParkConfig::default();
    println!("Configuration:");
    println!("  Attractions: {}", config.number_attractions);
    println!("  Open for {} minutes", config.time_open);
    println!(
        "  Park capacity: {} split as {:?}",
        config.park_capacity, config.queue_capacities
    );
    println!("  Arrival rates: {:?}", config.arrival_gammas);

    let runner_config = RunnerConfig::new().with_concurrency(ConcurrencyMode::Rayon);
    let runner = ReplicationRunner::new(config, runner_config.clone())?;
    let summary = runner.run(100, 42)?;

    println!("\n📊 Default partition over {} replications:", summary.replications);
    println!(
        "  Tourists lost to full queues: {:.2} ± {:.2}",
        summary.total_departed.mean(),
        summary.total_departed.half_width(Z_95)
    );
    println!(
        "  Fraction of arrivals lost: {:.4}",
        summary.percent_departed.mean()
    );
    println!(
        "  Average number in system: {:.2}",
        summary.average_number_in_system.mean()
    );
    for (index, utilization) in summary.attraction_utilization_percentages.iter().enumerate() {
        println!("  Attraction {} utilization: {:.3}", index, utilization.mean());
    }

    let mut problem = CapacityPartitionProblem::with_defaults()?.with_runner_config(runner_config);
    println!(
        "\n🔍 Random search on {} ({} replications per candidate, budget {})",
        problem.name(),
        problem.replications_per_evaluation(),
        problem.budget()
    );

    let mut rng = StdRng::seed_from_u64(7);
    let mut candidates = vec![problem.initial_solution().to_vec()];
    for _ in 0..5 {
        candidates.push(problem.sample_random_feasible(&mut rng));
    }

    let mut best: Option<(Vec<i64>, f64)> = None;
    for candidate in candidates {
        let Some(estimate) = problem.evaluate(&candidate)? else {
            println!("  Budget exhausted");
            break;
        };
        println!(
            "  {:?} -> {:.2} (se {:.2})",
            candidate, estimate.mean, estimate.std_error
        );
        if best.as_ref().map_or(true, |(_, mean)| estimate.mean < *mean) {
            best = Some((candidate, estimate.mean));
        }
    }

    if let Some((partition, mean)) = best {
        println!("\n✅ Best partition {:?} loses {:.2} tourists on average", partition, mean);
    }
    println!("  Replications used: {}", problem.replications_used());

    Ok(())
}
