//! RiskWatch Core - clinical risk scoring and audited patient updates
//!
//! This crate is pure computation over patient snapshots:
//! - Field catalogue with per-field coercion, validation and comparison
//! - Risk engine: deterministic score, tier and rule reasons
//! - Audit/diff engine: field diff, risk trace, batched audit records
//! - History grouping of audit trails into update batches
//! - `PatientStore` collaborator trait with an in-memory backend
//!
//! Persistence lives in `riskwatch-store`; orchestration and lifecycle
//! logging live in `riskwatch-engine`.

pub use riskwatch_core_types as core_types;

pub mod audit;
pub mod config;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod risk;

// Re-export commonly used types
pub use audit::{reconcile, AuditBatch, AuditRecord, Reconciliation};
pub use config::RiskWatchConfig;
pub use errors::{ExError, ExErrorKind, Result, RiskWatchError};
pub use model::{Field, FieldMap, FieldValue, PatientRecord, PatientSnapshot};
pub use ops::{MemoryStore, PatientStore};
pub use risk::{evaluate, evaluate_fields, RiskLevel, RiskResult};
