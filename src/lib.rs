pub mod core;
pub mod restaurant;

// Re-export commonly used types
pub use crate::core::errors::SimError;
pub use crate::core::types::{ProcessId, ResourceId, SimTime};
pub use crate::restaurant::config::SimulationConfig;
pub use crate::restaurant::metrics::{CustomerRecord, CustomerStatus, Summary};
pub use crate::restaurant::simulate;
pub use crate::restaurant::simulation::{Simulation, SimulationReport};
pub use crate::restaurant::stage::Stage;
