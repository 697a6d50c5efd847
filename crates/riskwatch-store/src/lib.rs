//! RiskWatch Store - SQLite persistence for patients and their audit trail
//!
//! Provides:
//! - Connection helpers (foreign keys, WAL, busy timeout)
//! - Embedded, checksummed schema migrations
//! - `SqlitePatientStore` implementing the core `PatientStore` collaborator
//! - Dashboard queries (patient list, full audit log, risk distribution,
//!   recent admissions)

pub mod db;
pub mod errors;
pub mod migrations;
pub mod repo;

// Re-export key types
pub use errors::Result;
pub use repo::{RiskSummary, SqlitePatientStore, RECENT_ADMISSIONS_LIMIT};
