use crate::core::errors::SimError;
use crate::core::types::SimTime;
use crate::restaurant::customer::ServicePolicy;
use serde::{Deserialize, Serialize};

/// Seed used when none is supplied, so that runs are reproducible
pub const DEFAULT_SEED: u64 = 42;
/// Fixed time a customer spends at the checkout desk once served
pub const CHECKOUT_DELAY: SimTime = 2.0;
/// Waiting time above which a customer complains
pub const COMPLAINT_THRESHOLD: SimTime = 7.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub simulation_horizon: u64,
    pub mean_inter_arrival: f64,
    pub random_seed: u64,
    pub checkout_capacity: usize,
    pub kitchen_capacity: usize,
    pub checkout_delay: SimTime,
    pub complaint_threshold: SimTime,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            simulation_horizon: 100,
            mean_inter_arrival: 4.0,
            random_seed: DEFAULT_SEED,
            checkout_capacity: 1,
            kitchen_capacity: 1,
            checkout_delay: CHECKOUT_DELAY,
            complaint_threshold: COMPLAINT_THRESHOLD,
        }
    }
}

impl SimulationConfig {
    pub fn with_simulation_horizon(mut self, horizon: u64) -> Self {
        self.simulation_horizon = horizon;
        self
    }

    pub fn with_mean_inter_arrival(mut self, mean: f64) -> Self {
        self.mean_inter_arrival = mean;
        self
    }

    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    pub fn with_capacities(mut self, checkout: usize, kitchen: usize) -> Self {
        self.checkout_capacity = checkout;
        self.kitchen_capacity = kitchen;
        self
    }

    /// Horizon as simulated time
    pub fn horizon(&self) -> SimTime {
        self.simulation_horizon as SimTime
    }

    /// Per-customer constants handed to every customer process
    pub fn service_policy(&self) -> ServicePolicy {
        ServicePolicy {
            checkout_delay: self.checkout_delay,
            complaint_threshold: self.complaint_threshold,
        }
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if !(self.mean_inter_arrival.is_finite() && self.mean_inter_arrival > 0.0) {
            return Err(SimError::InvalidInput(format!(
                "Mean inter-arrival time must be a positive number, got {}",
                self.mean_inter_arrival
            )));
        }

        if self.checkout_capacity == 0 || self.kitchen_capacity == 0 {
            return Err(SimError::InvalidInput(
                "Stage capacities must be greater than 0".to_string(),
            ));
        }

        if !(self.checkout_delay.is_finite() && self.checkout_delay >= 0.0) {
            return Err(SimError::InvalidInput(format!(
                "Checkout delay must be non-negative, got {}",
                self.checkout_delay
            )));
        }

        if !(self.complaint_threshold.is_finite() && self.complaint_threshold >= 0.0) {
            return Err(SimError::InvalidInput(format!(
                "Complaint threshold must be non-negative, got {}",
                self.complaint_threshold
            )));
        }

        Ok(())
    }
}
