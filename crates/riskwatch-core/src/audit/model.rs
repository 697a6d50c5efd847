//! Audit output types.
//!
//! Records are immutable once built; the core never updates or deletes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Field, FieldValue, PatientRecord};
use crate::risk::{RiskLevel, RiskResult};

/// `field_name` of the single record written when a patient is created
pub const CREATION_FIELD: &str = "Patient Record";

/// Shared trace of the creation record
pub const CREATION_REASON: &str = "Initial Patient Registration";

/// Placeholder for "no prior value" in creation records
pub const NO_VALUE: &str = "-";

/// One changed field of one update, with the risk delta of the whole update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Unique identifier (UUID v7)
    pub id: String,
    pub patient_id: String,
    /// Machine field name, or `Patient Record` for the creation record
    pub field_name: String,
    /// Title-cased label shown to reviewers
    pub field_label: String,
    pub old_value: String,
    pub new_value: String,
    /// Tier before the update; `-` on the creation record
    pub risk_before: String,
    pub risk_after: RiskLevel,
    pub score_before: u32,
    pub score_after: u32,
    /// Risk trace shared by every record of the batch
    pub reason: String,
    /// Shared by all records of one update; `None` for the creation record
    pub batch_id: Option<Uuid>,
    pub timestamp: DateTime<Utc>,
}

impl AuditRecord {
    pub fn is_creation(&self) -> bool {
        self.batch_id.is_none() && self.field_name == CREATION_FIELD
    }
}

/// A field whose proposed value differs from the current one
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    pub field: Field,
    pub old: FieldValue,
    pub new: FieldValue,
}

impl FieldChange {
    pub fn old_display(&self) -> String {
        self.old.display()
    }

    pub fn new_display(&self) -> String {
        self.new.display()
    }
}

/// Result of reconciling proposed changes against a stored record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// The record after applying changed fields, risk columns recomputed
    pub record: PatientRecord,
    /// One per changed field, in field catalogue order; empty for a no-op
    pub audit_records: Vec<AuditRecord>,
    /// `None` when nothing changed
    pub batch_id: Option<Uuid>,
    pub risk_before: RiskResult,
    pub risk_after: RiskResult,
}

impl Reconciliation {
    pub fn is_noop(&self) -> bool {
        self.audit_records.is_empty()
    }

    /// Names of the fields that changed, in emission order
    pub fn changed_fields(&self) -> Vec<&str> {
        self.audit_records
            .iter()
            .map(|r| r.field_name.as_str())
            .collect()
    }
}
