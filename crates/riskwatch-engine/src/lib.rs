//! RiskWatch Engine - Orchestration layer
//!
//! Coordinates core scoring/reconciliation with SQLite persistence and owns
//! operation lifecycle logging.

pub mod commands;

pub use commands::engine_command::{apply_engine_command, EngineCommand, EngineCommandResult};
pub use commands::patient::PatientCreated;
