//! The two-stage restaurant: arrivals, customers, menu and metrics.

pub mod arrival;
pub mod config;
pub mod customer;
pub mod input;
pub mod menu;
pub mod metrics;
pub mod random;
pub mod replication;
pub mod simulation;
pub mod stage;

#[cfg(test)]
mod tests;

use crate::core::errors::SimError;
use config::SimulationConfig;
use simulation::{Simulation, SimulationReport};

/// Run the restaurant once for the configured horizon
pub fn simulate(config: &SimulationConfig) -> Result<SimulationReport, SimError> {
    let mut simulation = Simulation::new(config.clone())?;
    simulation.spawn_arrivals()?;
    simulation.run(config.horizon())
}
