use super::types::{ProcessId, ResourceId};

/// Errors raised by the simulation core and its input boundary
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// Malformed or out-of-range input, detected before a run starts
    InvalidInput(String),
    /// Negative or NaN scheduling delay
    InvalidDelay(f64),
    /// A process was resumed with a signal its current state cannot handle
    UnexpectedSignal {
        process: ProcessId,
        state: String,
        signal: String,
    },
    /// A grant was handed back to a resource that did not issue it
    ForeignGrant {
        expected: ResourceId,
        found: ResourceId,
    },
    /// No resource is registered under this ID
    UnknownResource(ResourceId),
    /// The replication thread pool could not be built
    ThreadPool(String),
}

impl std::fmt::Display for SimError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            SimError::InvalidDelay(delay) => {
                write!(f, "Invalid delay: cannot schedule {} time units ahead", delay)
            }
            SimError::UnexpectedSignal {
                process,
                state,
                signal,
            } => write!(
                f,
                "Unexpected signal: {} received {} while {}",
                process, signal, state
            ),
            SimError::ForeignGrant { expected, found } => write!(
                f,
                "Foreign grant: {} grant released to {}",
                found, expected
            ),
            SimError::UnknownResource(id) => write!(f, "Unknown resource: {}", id),
            SimError::ThreadPool(msg) => write!(f, "Thread pool error: {}", msg),
        }
    }
}

impl std::error::Error for SimError {}
