use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::model::AuditRecord;
use crate::risk::RiskLevel;

/// One logical update event as shown in a patient's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditBatch {
    pub batch_id: Option<Uuid>,
    pub timestamp: DateTime<Utc>,
    pub reason: String,
    pub risk_before: String,
    pub risk_after: RiskLevel,
    pub score_before: u32,
    pub score_after: u32,
    pub changes: Vec<AuditRecord>,
}

impl AuditBatch {
    fn start(record: AuditRecord) -> Self {
        Self {
            batch_id: record.batch_id,
            timestamp: record.timestamp,
            reason: record.reason.clone(),
            risk_before: record.risk_before.clone(),
            risk_after: record.risk_after,
            score_before: record.score_before,
            score_after: record.score_after,
            changes: vec![record],
        }
    }

    fn accepts(&self, record: &AuditRecord) -> bool {
        self.batch_id.is_some() && self.batch_id == record.batch_id
    }
}

/// Group a patient's audit trail into batches, newest first
///
/// Consecutive records sharing a batch id form one batch; records without a
/// batch id each stand alone. Ties on timestamp keep input order.
pub fn group_history(records: Vec<AuditRecord>) -> Vec<AuditBatch> {
    let mut records = records;
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    let mut batches: Vec<AuditBatch> = Vec::new();
    for record in records {
        match batches.last_mut() {
            Some(batch) if batch.accepts(&record) => batch.changes.push(record),
            _ => batches.push(AuditBatch::start(record)),
        }
    }
    batches
}
