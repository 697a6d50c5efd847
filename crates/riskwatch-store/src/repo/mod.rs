//! Repository layer for persisting patients and audit records to SQLite

pub mod hydration;
pub mod sqlite_repo;

pub use sqlite_repo::{RiskSummary, SqlitePatientStore, RECENT_ADMISSIONS_LIMIT};
