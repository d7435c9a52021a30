//! Random draws behind one seam, so runs can be seeded or scripted.

use crate::core::errors::SimError;
use crate::core::types::SimTime;
use crate::restaurant::menu::{MenuItem, MENU};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp};
use std::collections::VecDeque;

pub trait RandomProcessGenerator {
    /// Gap until the next customer arrives
    fn next_inter_arrival(&mut self) -> SimTime;

    /// The dish the current customer orders
    fn choose_menu_item(&mut self) -> MenuItem;
}

/// Exponential inter-arrival gaps and uniform menu choices from one seeded stream
#[derive(Debug, Clone)]
pub struct SeededGenerator {
    rng: StdRng,
    inter_arrival: Exp<f64>,
    catalog: &'static [MenuItem],
}

impl SeededGenerator {
    pub fn new(seed: u64, mean_inter_arrival: f64) -> Result<Self, SimError> {
        if !(mean_inter_arrival.is_finite() && mean_inter_arrival > 0.0) {
            return Err(SimError::InvalidInput(format!(
                "Mean inter-arrival time must be a positive number, got {}",
                mean_inter_arrival
            )));
        }

        let inter_arrival = Exp::new(1.0 / mean_inter_arrival)
            .map_err(|e| SimError::InvalidInput(format!("Arrival rate rejected: {}", e)))?;

        Ok(Self {
            rng: StdRng::seed_from_u64(seed),
            inter_arrival,
            catalog: &MENU,
        })
    }
}

impl RandomProcessGenerator for SeededGenerator {
    fn next_inter_arrival(&mut self) -> SimTime {
        self.inter_arrival.sample(&mut self.rng)
    }

    fn choose_menu_item(&mut self) -> MenuItem {
        self.catalog[self.rng.gen_range(0..self.catalog.len())]
    }
}

/// Replays fixed gaps and dishes.
///
/// Once the gaps run out every further arrival is infinitely far away, so a
/// script of N gaps injects exactly N customers. Once the dishes run out
/// every customer orders the first dish of the menu.
#[derive(Debug, Clone)]
pub struct ScriptedGenerator {
    gaps: VecDeque<SimTime>,
    items: VecDeque<MenuItem>,
}

impl ScriptedGenerator {
    pub fn new(gaps: Vec<SimTime>, items: Vec<MenuItem>) -> Self {
        Self {
            gaps: gaps.into(),
            items: items.into(),
        }
    }
}

impl RandomProcessGenerator for ScriptedGenerator {
    fn next_inter_arrival(&mut self) -> SimTime {
        self.gaps.pop_front().unwrap_or(SimTime::INFINITY)
    }

    fn choose_menu_item(&mut self) -> MenuItem {
        self.items.pop_front().unwrap_or(MENU[0])
    }
}
