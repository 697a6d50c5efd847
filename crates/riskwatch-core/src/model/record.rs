use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::snapshot::PatientSnapshot;
use crate::risk::{evaluate, RiskLevel, RiskResult};

/// A persisted patient: the current snapshot plus its cached risk evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// Unique identifier (UUID v7)
    pub id: String,

    pub snapshot: PatientSnapshot,

    /// Always `evaluate(&snapshot).total_score`
    pub risk_score: u32,

    /// Always `evaluate(&snapshot).risk_level`
    pub risk_level: RiskLevel,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PatientRecord {
    /// Create a new record with a fresh id, scoring the snapshot
    pub fn new(snapshot: PatientSnapshot) -> (Self, RiskResult) {
        Self::with_id(uuid::Uuid::now_v7().to_string(), snapshot)
    }

    /// Create a record with a caller-chosen id
    pub fn with_id(id: String, snapshot: PatientSnapshot) -> (Self, RiskResult) {
        let result = evaluate(&snapshot);
        let now = Utc::now();
        let record = Self {
            id,
            snapshot,
            risk_score: result.total_score,
            risk_level: result.risk_level,
            created_at: now,
            updated_at: now,
        };
        (record, result)
    }

    /// Replace the snapshot and recompute the cached risk columns
    pub fn apply_snapshot(&mut self, snapshot: PatientSnapshot, at: DateTime<Utc>) -> RiskResult {
        let result = evaluate(&snapshot);
        self.snapshot = snapshot;
        self.risk_score = result.total_score;
        self.risk_level = result.risk_level;
        self.updated_at = at;
        result
    }
}
