use restaurant_sim::core::config::{ConcurrencyMode, ExecutionConfig};
use restaurant_sim::restaurant::config::DEFAULT_SEED;
use restaurant_sim::restaurant::input::SimulationInput;
use restaurant_sim::restaurant::replication::run_replications;
use restaurant_sim::{simulate, SimError, SimulationConfig};
use std::process;

const USAGE: &str =
    "usage: restaurant_main <horizon> <mean_inter_arrival> [--details] [--json] [--replications N]";

/// Command-line options for one invocation
#[derive(Debug, Default)]
struct CliOptions {
    horizon: String,
    mean_inter_arrival: String,
    details: bool,
    json: bool,
    replications: Option<usize>,
}

fn parse_args(args: &[String]) -> Result<CliOptions, SimError> {
    let mut options = CliOptions::default();
    let mut positional = Vec::new();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--details" => options.details = true,
            "--json" => options.json = true,
            "--replications" => {
                let count = iter
                    .next()
                    .and_then(|value| value.parse::<usize>().ok())
                    .filter(|&count| count > 0)
                    .ok_or_else(|| {
                        SimError::InvalidInput(
                            "--replications needs a positive whole number".to_string(),
                        )
                    })?;
                options.replications = Some(count);
            }
            flag if flag.starts_with("--") => {
                return Err(SimError::InvalidInput(format!("unknown option {}", flag)));
            }
            value => positional.push(value.to_string()),
        }
    }

    if positional.len() != 2 {
        return Err(SimError::InvalidInput(USAGE.to_string()));
    }
    options.mean_inter_arrival = positional.pop().unwrap_or_default();
    options.horizon = positional.pop().unwrap_or_default();
    Ok(options)
}

fn run(options: &CliOptions) -> Result<(), Box<dyn std::error::Error>> {
    let input = SimulationInput::parse(&options.horizon, &options.mean_inter_arrival)?;
    let config = input.apply_to(SimulationConfig::default());

    if let Some(count) = options.replications {
        let execution = ExecutionConfig::new(DEFAULT_SEED)
            .with_replications(count)
            .with_concurrency(ConcurrencyMode::Rayon);
        let summary = run_replications(&config, &execution)?;

        if options.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            for outcome in &summary.outcomes {
                println!("seed {:>6}: {}", outcome.seed, outcome.summary.headline());
            }
            println!();
            println!("Customers served across all runs: {}", summary.total_customers);
            println!("Runs without customers: {}", summary.runs_without_customers);
            match summary.mean_of_means {
                Some(mean) => println!("Mean of average waiting times: {:.2} minutes.", mean),
                None => println!("No run served any customers."),
            }
        }
        return Ok(());
    }

    let report = simulate(&config)?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", report.summary_text());
    if report.in_flight_customers > 0 {
        println!(
            "{} of {} customers were still inside at closing time.",
            report.in_flight_customers, report.customers_arrived
        );
    }
    if options.details {
        for record in &report.records {
            println!("{}", record);
        }
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp(None)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_args(&args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run(&options) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
