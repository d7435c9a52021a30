use super::errors::SimError;
use super::event::Signal;
use super::event_scheduler::EventScheduler;
use super::resource::{Acquisition, Grant, ResourcePool};
use super::types::{ProcessId, ResourceId, SimTime};
use std::collections::HashMap;

/// Broad category of a process, used for end-of-run accounting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessKind {
    /// Long-lived generator of other processes
    Source,
    /// Something that flows through the resources and then finishes
    Entity,
}

/// What a process reports after handling one signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    /// Waiting on a timeout or a grant; keep it in the table
    Suspended,
    /// Reached its terminal state; drop it
    Finished,
}

/// A cooperative process written as an explicit state machine.
///
/// `M` is the model state shared by every process of a run. `resume` runs
/// until the process suspends again, either on a timed delay it scheduled
/// through the context or on a queued resource request.
pub trait Process<M> {
    fn kind(&self) -> ProcessKind;

    /// Name of the current state, for logs and protocol errors
    fn state_name(&self) -> &'static str;

    fn resume(&mut self, signal: Signal, ctx: &mut ProcessContext<'_, M>) -> Result<Activity, SimError>;
}

/// Suspended processes owned by a simulation run
pub struct ProcessTable<M> {
    next_id: u64,
    processes: HashMap<ProcessId, Box<dyn Process<M>>>,
}

impl<M> ProcessTable<M> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            processes: HashMap::new(),
        }
    }

    /// Register a process and hand out its ID
    pub fn insert(&mut self, process: Box<dyn Process<M>>) -> ProcessId {
        let id = ProcessId::new(self.next_id);
        self.next_id += 1;
        self.processes.insert(id, process);
        id
    }

    /// Remove a process while it runs
    pub fn take(&mut self, id: ProcessId) -> Option<Box<dyn Process<M>>> {
        self.processes.remove(&id)
    }

    /// Put a suspended process back
    pub fn restore(&mut self, id: ProcessId, process: Box<dyn Process<M>>) {
        self.processes.insert(id, process);
    }

    pub fn count_kind(&self, kind: ProcessKind) -> usize {
        self.processes
            .values()
            .filter(|process| process.kind() == kind)
            .count()
    }
}

impl<M> Default for ProcessTable<M> {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything a process may touch while it is being resumed
pub struct ProcessContext<'a, M> {
    id: ProcessId,
    scheduler: &'a mut EventScheduler,
    resources: &'a mut ResourcePool,
    table: &'a mut ProcessTable<M>,
    model: &'a mut M,
}

impl<'a, M> ProcessContext<'a, M> {
    pub fn new(
        id: ProcessId,
        scheduler: &'a mut EventScheduler,
        resources: &'a mut ResourcePool,
        table: &'a mut ProcessTable<M>,
        model: &'a mut M,
    ) -> Self {
        Self {
            id,
            scheduler,
            resources,
            table,
            model,
        }
    }

    /// ID of the process being resumed
    pub fn id(&self) -> ProcessId {
        self.id
    }

    pub fn now(&self) -> SimTime {
        self.scheduler.now()
    }

    /// Suspend the current process for `delay` time units
    pub fn timeout(&mut self, delay: SimTime) -> Result<(), SimError> {
        self.scheduler.schedule_after(delay, self.id, Signal::Timeout)
    }

    /// Request a slot of `resource`.
    ///
    /// Returns the grant when a slot is free. Otherwise the current process is
    /// queued and will be resumed later with `Signal::Granted`.
    pub fn acquire(&mut self, resource: ResourceId) -> Result<Option<Grant>, SimError> {
        let now = self.scheduler.now();
        match self.resources.get_mut(resource)?.acquire(self.id, now) {
            Acquisition::Granted(grant) => Ok(Some(grant)),
            Acquisition::Queued { .. } => Ok(None),
        }
    }

    /// Hand a slot back, waking the next waiter with a zero-delay event
    pub fn release(&mut self, grant: Grant) -> Result<(), SimError> {
        let now = self.scheduler.now();
        let resource = self.resources.get_mut(grant.resource())?;
        if let Some(next) = resource.release(grant, now)? {
            let waiter = next.holder();
            self.scheduler
                .schedule_after(0.0, waiter, Signal::Granted(next))?;
        }
        Ok(())
    }

    /// Register a new process that starts at the current time
    pub fn spawn(&mut self, process: Box<dyn Process<M>>) -> Result<ProcessId, SimError> {
        spawn_into(self.table, self.scheduler, process)
    }

    /// Model state shared by all processes of the run
    pub fn model(&mut self) -> &mut M {
        &mut *self.model
    }
}

pub(crate) fn spawn_into<M>(
    table: &mut ProcessTable<M>,
    scheduler: &mut EventScheduler,
    process: Box<dyn Process<M>>,
) -> Result<ProcessId, SimError> {
    let id = table.insert(process);
    scheduler.schedule_after(0.0, id, Signal::Start)?;
    Ok(id)
}

/// Build the protocol error for a signal the current state cannot accept
pub fn unexpected_signal(process: ProcessId, state: &'static str, signal: &Signal) -> SimError {
    SimError::UnexpectedSignal {
        process,
        state: state.to_string(),
        signal: signal.kind().to_string(),
    }
}
