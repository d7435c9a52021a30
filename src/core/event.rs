use super::resource::Grant;
use super::types::{ProcessId, SimTime};

/// What a process is told when the scheduler resumes it
#[derive(Debug)]
pub enum Signal {
    /// First activation after spawning
    Start,
    /// A timed delay has elapsed
    Timeout,
    /// A queued resource request has been granted
    Granted(Grant),
}

impl Signal {
    pub fn kind(&self) -> &'static str {
        match self {
            Signal::Start => "Start",
            Signal::Timeout => "Timeout",
            Signal::Granted(_) => "Granted",
        }
    }
}

/// A pending resumption of one process at a point in simulated time
#[derive(Debug)]
pub struct Event {
    pub time: SimTime,
    pub target: ProcessId,
    pub signal: Signal,
}

impl Event {
    pub fn new(time: SimTime, target: ProcessId, signal: Signal) -> Self {
        Self {
            time,
            target,
            signal,
        }
    }
}
