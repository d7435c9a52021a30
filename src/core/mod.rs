pub mod config;
pub mod errors;
pub mod event;
pub mod event_scheduler;
pub mod process;
pub mod resource;
pub mod simulation_engine;
pub mod types;
