//! One restaurant run on top of the generic engine.

use crate::core::errors::SimError;
use crate::core::process::{Process, ProcessContext};
use crate::core::resource::ResourceStats;
use crate::core::simulation_engine::{SimulationEngine, SimulationObserver};
use crate::core::types::{ProcessId, SimTime};
use crate::restaurant::arrival::ArrivalProcess;
use crate::restaurant::config::SimulationConfig;
use crate::restaurant::metrics::{CustomerRecord, MetricsCollector, Summary};
use crate::restaurant::random::{RandomProcessGenerator, SeededGenerator};
use crate::restaurant::stage::Stage;
use log::{info, warn};
use serde::Serialize;

/// State shared by the arrival stream and every customer of a run
pub struct RestaurantState {
    generator: Box<dyn RandomProcessGenerator>,
    metrics: MetricsCollector,
}

impl RestaurantState {
    pub fn new(generator: Box<dyn RandomProcessGenerator>) -> Self {
        Self {
            generator,
            metrics: MetricsCollector::new(),
        }
    }

    pub fn generator(&mut self) -> &mut dyn RandomProcessGenerator {
        self.generator.as_mut()
    }

    pub fn metrics(&mut self) -> &mut MetricsCollector {
        &mut self.metrics
    }
}

/// Context handed to restaurant processes while they run
pub type RestaurantContext<'a> = ProcessContext<'a, RestaurantState>;

/// Everything a finished run hands back to the shell
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub run_id: String,
    pub random_seed: u64,
    pub horizon: SimTime,
    /// Time of the last executed event
    pub final_time: SimTime,
    pub events_processed: u64,
    /// Events due after the horizon, never executed
    pub abandoned_events: usize,
    /// Customers that walked in, served or not
    pub customers_arrived: u64,
    /// Customers still inside the restaurant at the horizon; they get no record
    pub in_flight_customers: usize,
    /// Checkout first, then kitchen
    pub resources: Vec<ResourceStats>,
    pub summary: Summary,
    pub records: Vec<CustomerRecord>,
}

impl SimulationReport {
    /// Summary string shown to the user after a run
    pub fn summary_text(&self) -> String {
        match self.summary {
            Summary::NoCustomers => self.summary.to_string(),
            Summary::Served { .. } => format!(
                "Simulation finished after {} minutes.\n\n{}",
                self.horizon, self.summary
            ),
        }
    }
}

/// One simulation run: stages, processes, random source and results
pub struct Simulation {
    config: SimulationConfig,
    engine: SimulationEngine<RestaurantState>,
}

impl Simulation {
    /// Create a run seeded from the configuration
    pub fn new(config: SimulationConfig) -> Result<Self, SimError> {
        config.validate()?;
        let generator = SeededGenerator::new(config.random_seed, config.mean_inter_arrival)?;
        Self::with_generator(config, Box::new(generator))
    }

    /// Create a run that draws from a caller-supplied generator
    pub fn with_generator(
        config: SimulationConfig,
        generator: Box<dyn RandomProcessGenerator>,
    ) -> Result<Self, SimError> {
        config.validate()?;
        let pool = Stage::build_pool(config.checkout_capacity, config.kitchen_capacity)?;
        let engine = SimulationEngine::new(pool, RestaurantState::new(generator));
        Ok(Self { config, engine })
    }

    /// Add an observer to the simulation
    pub fn add_observer(&mut self, observer: Box<dyn SimulationObserver>) {
        self.engine.add_observer(observer);
    }

    /// Register an extra process that starts at the current time
    pub fn spawn(&mut self, process: Box<dyn Process<RestaurantState>>) -> Result<ProcessId, SimError> {
        self.engine.spawn(process)
    }

    /// Register the customer arrival stream
    pub fn spawn_arrivals(&mut self) -> Result<ProcessId, SimError> {
        let arrivals = ArrivalProcess::new(self.config.service_policy());
        self.engine.spawn(Box::new(arrivals))
    }

    /// Run every event due at or before `until`, then report.
    ///
    /// Customers still being served at `until` are abandoned without a record.
    pub fn run(self, until: SimTime) -> Result<SimulationReport, SimError> {
        let run_id = self.engine.run_id();
        info!(
            "[Simulation:{}] Starting run: horizon={}, seed={}, capacities={}/{}",
            run_id,
            until,
            self.config.random_seed,
            self.config.checkout_capacity,
            self.config.kitchen_capacity
        );

        let (run, state) = self.engine.run(until)?;
        if run.in_flight_entities > 0 {
            warn!(
                "[Simulation:{}] {} customers still in service at the horizon",
                run_id, run.in_flight_entities
            );
        }

        let summary = state.metrics.summarize();
        info!("[Simulation:{}] {}", run_id, summary.headline());

        Ok(SimulationReport {
            run_id: run_id.to_string(),
            random_seed: self.config.random_seed,
            horizon: run.horizon,
            final_time: run.final_time,
            events_processed: run.events_processed,
            abandoned_events: run.abandoned_events,
            customers_arrived: state.metrics.arrivals(),
            in_flight_customers: run.in_flight_entities,
            resources: run.resources,
            summary,
            records: state.metrics.into_records(),
        })
    }
}
