use super::errors::SimError;
use super::event_scheduler::EventScheduler;
use super::process::{spawn_into, Activity, Process, ProcessContext, ProcessKind, ProcessTable};
use super::resource::{ResourcePool, ResourceStats};
use super::types::{ProcessId, SimTime};
use log::{debug, info, warn};
use uuid::Uuid;

/// Observer trait for simulation events
pub trait SimulationObserver {
    /// Called when simulated time moves forward
    fn on_time_advance(&mut self, old_time: SimTime, new_time: SimTime);

    /// Called after a process has handled one event
    fn on_step_complete(&mut self, time: SimTime, process: ProcessId, resources: &ResourcePool);
}

/// How a run ended, independent of the model that was simulated
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub horizon: SimTime,
    /// Time of the last executed event
    pub final_time: SimTime,
    pub events_processed: u64,
    /// Events due after the horizon, never executed
    pub abandoned_events: usize,
    /// Entity processes still suspended when the run stopped
    pub in_flight_entities: usize,
    pub resources: Vec<ResourceStats>,
}

/// Event loop over processes that share a model state `M`
pub struct SimulationEngine<M> {
    run_id: Uuid,
    scheduler: EventScheduler,
    resources: ResourcePool,
    processes: ProcessTable<M>,
    model: M,
    observers: Vec<Box<dyn SimulationObserver>>,
    events_processed: u64,
}

impl<M> SimulationEngine<M> {
    /// Create an engine at time zero over the given resources
    pub fn new(resources: ResourcePool, model: M) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            scheduler: EventScheduler::new(),
            resources,
            processes: ProcessTable::new(),
            model,
            observers: Vec::new(),
            events_processed: 0,
        }
    }

    /// ID stamped on every log line of this run
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Add an observer to the simulation
    pub fn add_observer(&mut self, observer: Box<dyn SimulationObserver>) {
        self.observers.push(observer);
    }

    /// Register a process that starts at the current time
    pub fn spawn(&mut self, process: Box<dyn Process<M>>) -> Result<ProcessId, SimError> {
        spawn_into(&mut self.processes, &mut self.scheduler, process)
    }

    pub fn now(&self) -> SimTime {
        self.scheduler.now()
    }

    /// Process one event due at or before `horizon`, returns true if one was processed
    pub fn step(&mut self, horizon: SimTime) -> Result<bool, SimError> {
        let old_time = self.scheduler.now();
        let event = match self.scheduler.pop_due(horizon) {
            Some(event) => event,
            None => return Ok(false),
        };
        let new_time = self.scheduler.now();

        if old_time != new_time {
            for observer in &mut self.observers {
                observer.on_time_advance(old_time, new_time);
            }
        }

        let mut process = match self.processes.take(event.target) {
            Some(process) => process,
            None => {
                warn!(
                    "[Simulation:{}] {} signal for unknown process {} dropped",
                    self.run_id,
                    event.signal.kind(),
                    event.target
                );
                return Ok(true);
            }
        };

        debug!(
            "[Simulation:{}] t={:.3} {} <- {} ({})",
            self.run_id,
            new_time,
            event.target,
            event.signal.kind(),
            process.state_name()
        );

        let activity = {
            let mut ctx = ProcessContext::new(
                event.target,
                &mut self.scheduler,
                &mut self.resources,
                &mut self.processes,
                &mut self.model,
            );
            process.resume(event.signal, &mut ctx)?
        };

        match activity {
            Activity::Suspended => self.processes.restore(event.target, process),
            Activity::Finished => {
                debug!("[Simulation:{}] {} finished", self.run_id, event.target)
            }
        }

        self.events_processed += 1;
        for observer in &mut self.observers {
            observer.on_step_complete(new_time, event.target, &self.resources);
        }

        Ok(true)
    }

    /// Run every event due at or before `until`, then hand back the model.
    ///
    /// Events scheduled past `until` are abandoned, including entities that
    /// are still holding or waiting for a resource.
    pub fn run(mut self, until: SimTime) -> Result<(RunSummary, M), SimError> {
        if until.is_nan() || until < 0.0 {
            return Err(SimError::InvalidInput(format!(
                "horizon must be non-negative, got {}",
                until
            )));
        }

        while self.step(until)? {}

        let in_flight_entities = self.processes.count_kind(ProcessKind::Entity);
        let abandoned_events = if self.scheduler.has_events() {
            let abandoned = self.scheduler.discard_pending();
            debug!(
                "[Simulation:{}] horizon {} reached, {} events abandoned",
                self.run_id, until, abandoned
            );
            abandoned
        } else {
            0
        };

        info!(
            "[Simulation:{}] Finished after {} events at t={:.3}",
            self.run_id,
            self.events_processed,
            self.now()
        );

        let summary = RunSummary {
            horizon: until,
            final_time: self.now(),
            events_processed: self.events_processed,
            abandoned_events,
            in_flight_entities,
            resources: self.resources.stats(until),
        };
        Ok((summary, self.model))
    }
}
