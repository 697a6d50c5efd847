use super::store::PatientStore;
use crate::audit::{create_with_risk, group_history, reconcile, AuditBatch, AuditRecord, Reconciliation};
use crate::errors::ExError;
use crate::model::{FieldMap, PatientRecord};
use crate::risk::RiskResult;

/// Register a new patient and write its creation record
///
/// # Errors
///
/// `InvalidField` for a bad initial value, or a store failure.
pub fn create_patient<S: PatientStore + ?Sized>(
    store: &mut S,
    fields: &FieldMap,
) -> Result<(PatientRecord, AuditRecord, RiskResult), ExError> {
    let (record, audit, result) =
        create_with_risk(fields).map_err(|e| ExError::from(e).with_op("create_patient"))?;
    store.create(&record, &audit)?;
    Ok((record, audit, result))
}

/// Load, reconcile and write back one patient
///
/// Callers sharing a backend must hold it exclusively (or inside one write
/// transaction) from load to commit.
///
/// # Errors
///
/// `NotFound` for an unknown patient, `InvalidField` for a bad proposed
/// value, or a store failure. Nothing is written on error.
pub fn reconcile_patient<S: PatientStore + ?Sized>(
    store: &mut S,
    patient_id: &str,
    proposed: &FieldMap,
) -> Result<Reconciliation, ExError> {
    let current = store.load(patient_id)?;
    let outcome = reconcile(&current, proposed).map_err(|e| {
        ExError::from(e)
            .with_op("reconcile_patient")
            .with_patient_id(patient_id)
    })?;
    store.commit(&outcome.record, &outcome.audit_records)?;
    Ok(outcome)
}

/// A patient's audit trail grouped into update batches, newest first
///
/// # Errors
///
/// `NotFound` for an unknown patient, or a store failure.
pub fn patient_history<S: PatientStore + ?Sized>(
    store: &S,
    patient_id: &str,
) -> Result<Vec<AuditBatch>, ExError> {
    store.load(patient_id)?;
    Ok(group_history(store.audit_trail(patient_id)?))
}
