//! Validation of the two scalar parameters the shell collects.

use crate::core::errors::SimError;
use crate::restaurant::config::SimulationConfig;

/// Validated horizon and arrival parameters, ready for the core
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationInput {
    pub simulation_horizon: u64,
    pub mean_inter_arrival: f64,
}

impl SimulationInput {
    /// Parse raw text fields; nothing reaches the core unless both are valid
    pub fn parse(horizon: &str, mean_inter_arrival: &str) -> Result<Self, SimError> {
        let simulation_horizon: u64 = horizon.trim().parse().map_err(|_| {
            SimError::InvalidInput(format!(
                "simulation horizon must be a whole number of minutes, got {:?}",
                horizon
            ))
        })?;
        if simulation_horizon == 0 {
            return Err(SimError::InvalidInput(
                "simulation horizon must be greater than 0".to_string(),
            ));
        }

        let mean: f64 = mean_inter_arrival.trim().parse().map_err(|_| {
            SimError::InvalidInput(format!(
                "mean inter-arrival time must be a number, got {:?}",
                mean_inter_arrival
            ))
        })?;
        if !(mean.is_finite() && mean > 0.0) {
            return Err(SimError::InvalidInput(format!(
                "mean inter-arrival time must be positive, got {}",
                mean
            )));
        }

        Ok(Self {
            simulation_horizon,
            mean_inter_arrival: mean,
        })
    }

    /// Apply the parsed values on top of `base`
    pub fn apply_to(&self, base: SimulationConfig) -> SimulationConfig {
        base.with_simulation_horizon(self.simulation_horizon)
            .with_mean_inter_arrival(self.mean_inter_arrival)
    }
}
