//! Independent runs of one configuration under several seeds.

use crate::core::config::{ConcurrencyMode, ExecutionConfig};
use crate::core::errors::SimError;
use crate::restaurant::config::SimulationConfig;
use crate::restaurant::metrics::Summary;
use crate::restaurant::simulate;
use log::info;
use rayon::prelude::*;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplicationOutcome {
    pub seed: u64,
    pub summary: Summary,
    pub in_flight_customers: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplicationSummary {
    /// One entry per seed, in the order the seeds were given
    pub outcomes: Vec<ReplicationOutcome>,
    pub total_customers: usize,
    pub runs_without_customers: usize,
    /// Mean of the per-run mean waiting times, over runs that served anyone
    pub mean_of_means: Option<f64>,
}

impl ReplicationSummary {
    fn from_outcomes(outcomes: Vec<ReplicationOutcome>) -> Self {
        let means: Vec<f64> = outcomes
            .iter()
            .filter_map(|outcome| outcome.summary.mean_waiting_time())
            .collect();
        let mean_of_means = if means.is_empty() {
            None
        } else {
            Some(means.iter().sum::<f64>() / means.len() as f64)
        };

        Self {
            total_customers: outcomes.iter().map(|o| o.summary.customer_count()).sum(),
            runs_without_customers: outcomes.len() - means.len(),
            mean_of_means,
            outcomes,
        }
    }
}

/// Run `config` once per seed of `execution` and aggregate the summaries.
///
/// The seed in `config` is ignored; each replication uses its own.
pub fn run_replications(
    config: &SimulationConfig,
    execution: &ExecutionConfig,
) -> Result<ReplicationSummary, SimError> {
    config.validate()?;
    execution.validate()?;
    let seeds = execution.seeds();

    let run_seed = |seed: u64| -> Result<ReplicationOutcome, SimError> {
        let report = simulate(&config.clone().with_random_seed(seed))?;
        Ok(ReplicationOutcome {
            seed,
            summary: report.summary,
            in_flight_customers: report.in_flight_customers,
        })
    };

    info!(
        "[Replications] Running {} seeds in {:?} mode",
        seeds.len(),
        execution.concurrency_mode
    );

    let outcomes: Result<Vec<ReplicationOutcome>, SimError> = match execution.concurrency_mode {
        ConcurrencyMode::Sequential => seeds.iter().map(|&seed| run_seed(seed)).collect(),
        ConcurrencyMode::Rayon => {
            let mut builder = rayon::ThreadPoolBuilder::new();
            if let Some(size) = execution.thread_pool_size {
                builder = builder.num_threads(size);
            }
            let pool = builder
                .build()
                .map_err(|e| SimError::ThreadPool(e.to_string()))?;
            pool.install(|| seeds.par_iter().map(|&seed| run_seed(seed)).collect())
        }
    };

    Ok(ReplicationSummary::from_outcomes(outcomes?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parallel_matches_sequential() {
        let config = SimulationConfig::default().with_simulation_horizon(60);
        let execution = ExecutionConfig::new(42).with_replications(6);

        let sequential = run_replications(&config, &execution).unwrap();
        let parallel = run_replications(
            &config,
            &execution
                .clone()
                .with_concurrency(ConcurrencyMode::Rayon)
                .with_thread_pool_size(3),
        )
        .unwrap();

        assert_eq!(sequential, parallel);
        assert_eq!(
            sequential.outcomes.iter().map(|o| o.seed).collect::<Vec<_>>(),
            vec![42, 43, 44, 45, 46, 47]
        );
        assert_eq!(
            sequential.total_customers,
            sequential
                .outcomes
                .iter()
                .map(|o| o.summary.customer_count())
                .sum::<usize>()
        );
    }

    #[test]
    fn test_invalid_config_fails_before_running() {
        let config = SimulationConfig::default().with_mean_inter_arrival(-1.0);
        let execution = ExecutionConfig::new(1).with_replications(2);
        let result = run_replications(&config, &execution);
        assert!(matches!(result, Err(SimError::InvalidInput(_))));

        let result = run_replications(
            &SimulationConfig::default(),
            &ExecutionConfig::new(1).with_replications(0),
        );
        assert!(matches!(result, Err(SimError::InvalidInput(_))));
    }
}
