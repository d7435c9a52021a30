//! How a batch of independent runs is executed.
//!
//! A single run is always single-threaded. These settings decide how many
//! seeded replications are run and how they are spread over threads.

use super::errors::SimError;
use serde::{Deserialize, Serialize};

/// Enumeration of supported concurrency modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConcurrencyMode {
    /// Replications run one after another on the calling thread
    #[default]
    Sequential,
    /// Replications run on a Rayon thread pool
    Rayon,
}

/// Seeds and threading for a batch of replications
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    pub concurrency_mode: ConcurrencyMode,
    /// Worker threads for Rayon mode; `None` lets Rayon pick
    pub thread_pool_size: Option<usize>,
    /// Number of independent runs
    pub replications: usize,
    /// Seed of the first run; run `i` uses `base_seed + i`
    pub base_seed: u64,
}

impl ExecutionConfig {
    /// One sequential run seeded with `base_seed`
    pub fn new(base_seed: u64) -> Self {
        Self {
            concurrency_mode: ConcurrencyMode::default(),
            thread_pool_size: None,
            replications: 1,
            base_seed,
        }
    }

    pub fn with_concurrency(mut self, mode: ConcurrencyMode) -> Self {
        self.concurrency_mode = mode;
        self
    }

    /// Set the thread pool size for parallel execution
    ///
    /// # Note
    /// This setting only affects execution when concurrency_mode is Rayon
    pub fn with_thread_pool_size(mut self, size: usize) -> Self {
        self.thread_pool_size = Some(size);
        self
    }

    pub fn with_replications(mut self, replications: usize) -> Self {
        self.replications = replications;
        self
    }

    /// Consecutive seeds, one per replication
    pub fn seeds(&self) -> Vec<u64> {
        (0..self.replications as u64)
            .map(|offset| self.base_seed.wrapping_add(offset))
            .collect()
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.replications == 0 {
            return Err(SimError::InvalidInput(
                "at least one replication is required".to_string(),
            ));
        }
        if self.thread_pool_size == Some(0) {
            return Err(SimError::InvalidInput(
                "thread pool size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
