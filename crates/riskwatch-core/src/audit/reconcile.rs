use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::diff::diff_fields;
use super::model::{
    AuditRecord, FieldChange, Reconciliation, CREATION_FIELD, CREATION_REASON, NO_VALUE,
};
use super::trace::render_risk_trace;
use crate::errors::Result;
use crate::model::{parse_known_fields, FieldMap, PatientRecord, PatientSnapshot};
use crate::risk::{evaluate, RiskResult};

/// Reconcile proposed changes against a stored record
///
/// Generates a fresh batch id and timestamp. See [`reconcile_at`].
///
/// # Errors
///
/// `InvalidFieldValue` when a proposed value fails coercion or validation.
pub fn reconcile(current: &PatientRecord, proposed: &FieldMap) -> Result<Reconciliation> {
    reconcile_at(current, proposed, Uuid::new_v4(), Utc::now())
}

/// Reconcile with a caller-supplied batch id and timestamp
///
/// 1. Strictly parse the known proposed fields.
/// 2. Keep only the fields whose value actually differs.
/// 3. Apply those to a copy of the current snapshot and score both sides.
/// 4. When something changed, emit one record per change sharing the batch
///    id, the trace and the before/after risk.
///
/// A no-op leaves `updated_at` untouched and returns no records and no batch.
///
/// # Errors
///
/// `InvalidFieldValue` when a proposed value fails coercion or validation.
pub fn reconcile_at(
    current: &PatientRecord,
    proposed: &FieldMap,
    batch_id: Uuid,
    at: DateTime<Utc>,
) -> Result<Reconciliation> {
    let parsed = parse_known_fields(proposed)?;
    let changes = diff_fields(&current.snapshot, &parsed);

    let mut merged = current.snapshot.clone();
    for change in &changes {
        merged.set(change.field, change.new.clone())?;
    }

    let risk_before = evaluate(&current.snapshot);
    let mut record = current.clone();

    if changes.is_empty() {
        let risk_after = evaluate(&merged);
        record.risk_score = risk_after.total_score;
        record.risk_level = risk_after.risk_level;
        return Ok(Reconciliation {
            record,
            audit_records: Vec::new(),
            batch_id: None,
            risk_before,
            risk_after,
        });
    }

    let risk_after = record.apply_snapshot(merged, at);
    let trace = render_risk_trace(&risk_before, &risk_after);
    let audit_records = changes
        .iter()
        .map(|change| {
            change_record(
                &current.id,
                change,
                &risk_before,
                &risk_after,
                &trace,
                batch_id,
                at,
            )
        })
        .collect();

    Ok(Reconciliation {
        record,
        audit_records,
        batch_id: Some(batch_id),
        risk_before,
        risk_after,
    })
}

fn change_record(
    patient_id: &str,
    change: &FieldChange,
    before: &RiskResult,
    after: &RiskResult,
    trace: &str,
    batch_id: Uuid,
    at: DateTime<Utc>,
) -> AuditRecord {
    AuditRecord {
        id: Uuid::now_v7().to_string(),
        patient_id: patient_id.to_string(),
        field_name: change.field.name().to_string(),
        field_label: change.field.label(),
        old_value: change.old_display(),
        new_value: change.new_display(),
        risk_before: before.risk_level.to_string(),
        risk_after: after.risk_level,
        score_before: before.total_score,
        score_after: after.total_score,
        reason: trace.to_string(),
        batch_id: Some(batch_id),
        timestamp: at,
    }
}

/// Build a new patient from an initial field map and its creation record
///
/// # Errors
///
/// `InvalidFieldValue` when a field fails coercion or validation.
pub fn create_with_risk(fields: &FieldMap) -> Result<(PatientRecord, AuditRecord, RiskResult)> {
    let snapshot = PatientSnapshot::from_fields_strict(fields)?;
    let (record, result) = PatientRecord::new(snapshot);
    let audit = creation_record(&record, &result);
    Ok((record, audit, result))
}

/// The solitary record marking a patient's registration
pub fn creation_record(record: &PatientRecord, result: &RiskResult) -> AuditRecord {
    AuditRecord {
        id: Uuid::now_v7().to_string(),
        patient_id: record.id.clone(),
        field_name: CREATION_FIELD.to_string(),
        field_label: CREATION_FIELD.to_string(),
        old_value: NO_VALUE.to_string(),
        new_value: "Created".to_string(),
        risk_before: NO_VALUE.to_string(),
        risk_after: result.risk_level,
        score_before: 0,
        score_after: result.total_score,
        reason: CREATION_REASON.to_string(),
        batch_id: None,
        timestamp: record.created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RiskWatchError;
    use crate::risk::RiskLevel;
    use serde_json::json;

    fn fields(value: serde_json::Value) -> FieldMap {
        serde_json::from_value(value).unwrap()
    }

    fn stored(value: serde_json::Value) -> PatientRecord {
        create_with_risk(&fields(value)).unwrap().0
    }

    #[test]
    fn test_creation_record_shape() {
        let (record, audit, result) = create_with_risk(&fields(json!({
            "full_name": "Jane Roe",
            "age": 80,
            "spo2": 85,
        })))
        .unwrap();
        assert_eq!(result.total_score, 4);
        assert_eq!(audit.patient_id, record.id);
        assert_eq!(audit.field_name, "Patient Record");
        assert_eq!(audit.old_value, "-");
        assert_eq!(audit.new_value, "Created");
        assert_eq!(audit.risk_before, "-");
        assert_eq!(audit.risk_after, RiskLevel::Medium);
        assert_eq!(audit.score_before, 0);
        assert_eq!(audit.score_after, 4);
        assert_eq!(audit.reason, "Initial Patient Registration");
        assert!(audit.batch_id.is_none());
        assert!(audit.is_creation());
    }

    #[test]
    fn test_records_follow_catalogue_order() {
        let current = stored(json!({"age": 50, "heart_rate": 80}));
        let batch = Uuid::new_v4();
        let out = reconcile_at(
            &current,
            &fields(json!({"wbc_flag": true, "heart_rate": 110, "age": 70})),
            batch,
            Utc::now(),
        )
        .unwrap();
        assert_eq!(out.changed_fields(), vec!["age", "heart_rate", "wbc_flag"]);
        assert_eq!(out.batch_id, Some(batch));
        assert_eq!(out.record.risk_score, 3);
        assert_eq!(out.record.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_invalid_value_rejected_without_partial_apply() {
        let current = stored(json!({"heart_rate": 80}));
        let err = reconcile(&current, &fields(json!({"heart_rate": 90, "spo2": "low"})))
            .unwrap_err();
        assert!(matches!(
            err,
            RiskWatchError::InvalidFieldValue { ref field, .. } if field == "spo2"
        ));
    }

    #[test]
    fn test_noop_keeps_updated_at() {
        let current = stored(json!({"heart_rate": 80}));
        let out = reconcile(&current, &fields(json!({"heart_rate": "80"}))).unwrap();
        assert!(out.is_noop());
        assert_eq!(out.batch_id, None);
        assert_eq!(out.record.updated_at, current.updated_at);
    }

    #[test]
    fn test_list_display_uses_placeholder_for_empty() {
        let current = stored(json!({"chronic_conditions": ["COPD"]}));
        let out = reconcile(&current, &fields(json!({"chronic_conditions": ""}))).unwrap();
        assert_eq!(out.audit_records.len(), 1);
        assert_eq!(out.audit_records[0].old_value, "COPD");
        assert_eq!(out.audit_records[0].new_value, "None");
        assert_eq!(out.audit_records[0].field_label, "Chronic Conditions");
        assert!(out.audit_records[0]
            .reason
            .contains("Removed: Chronic Condition: COPD (+1)"));
    }
}
