//! Audit/diff engine
//!
//! Reconciles proposed field changes against a stored record, scoring both
//! sides and emitting one immutable audit record per changed field.
//!
//! ## Entry points
//!
//! - [`reconcile`]: diff, merge, score, trace
//! - [`create_with_risk`]: first snapshot plus the creation record
//! - [`group_history`]: audit trail grouped into update batches
//!
//! ## Guarantees
//!
//! - **Batch consistency**: every record of one reconcile shares the batch id,
//!   the before/after tier and score, and the trace.
//! - **Order-insensitive lists**: reordering `chronic_conditions` is not a change.
//! - **No-op silence**: no changed field means no records and no batch.

pub mod diff;
pub mod history;
pub mod model;
pub mod reconcile;
pub mod trace;

pub use diff::{diff_fields, set_delta};
pub use history::{group_history, AuditBatch};
pub use model::{AuditRecord, FieldChange, Reconciliation};
pub use reconcile::{create_with_risk, creation_record, reconcile, reconcile_at};
pub use trace::render_risk_trace;
