//! Patient command handlers with boundary logging.
//!
//! ## Logging Ownership
//!
//! The engine layer owns lifecycle logging for patient operations:
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Lower layers (store, core) use only `tracing::debug!()` for internal details.
//!
//! ## Write serialization
//!
//! Writes run inside an `IMMEDIATE` transaction, which takes SQLite's write
//! lock before the current record is read. A second writer on the same
//! database waits (up to the connection's busy timeout) until the first has
//! committed, so it always reconciles against the latest row.

#![allow(clippy::result_large_err)]

use riskwatch_core::audit::{AuditBatch, AuditRecord, Reconciliation};
use riskwatch_core::model::{FieldMap, PatientRecord};
use riskwatch_core::ops::{self, PatientStore};
use riskwatch_core::risk::RiskResult;
use riskwatch_core::{log_op_end, log_op_error, log_op_start};
use riskwatch_store::errors::{from_rusqlite, Result};
use riskwatch_store::{RiskSummary, SqlitePatientStore};
use rusqlite::{Connection, TransactionBehavior};
use serde::Serialize;

/// Result of registering a patient
#[derive(Debug, Clone, Serialize)]
pub struct PatientCreated {
    pub record: PatientRecord,
    /// The single "Patient Record" entry opening the audit trail
    pub creation: AuditRecord,
    pub risk: RiskResult,
}

/// Register a new patient
///
/// Strictly parses `fields`, scores the snapshot and persists the record
/// together with its creation audit record.
///
/// ## Errors
///
/// - `InvalidField`: a present field failed coercion or validation
/// - `Persistence` / `Concurrency`: database error
pub fn patient_create(conn: &mut Connection, fields: &FieldMap) -> Result<PatientCreated> {
    log_op_start!("patient_create", field_count = fields.len());
    let start = std::time::Instant::now();

    let created = patient_create_impl(conn, fields).map_err(|e| {
        log_op_error!(
            "patient_create",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "patient_create",
        duration_ms = start.elapsed().as_millis() as u64,
        patient_id = created.record.id.as_str(),
        risk_level = created.risk.risk_level.as_str()
    );

    Ok(created)
}

fn patient_create_impl(conn: &mut Connection, fields: &FieldMap) -> Result<PatientCreated> {
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(from_rusqlite)?;
    let (record, creation, risk) = {
        let mut store = SqlitePatientStore::new(&tx);
        ops::create_patient(&mut store, fields)?
    };
    tx.commit().map_err(from_rusqlite)?;

    Ok(PatientCreated {
        record,
        creation,
        risk,
    })
}

/// Apply a proposed field map to an existing patient
///
/// Load, diff, rescore and write-back all happen under one write lock. A
/// proposal that changes nothing produces no audit records; the stored risk
/// columns are still refreshed from the current rules.
///
/// ## Errors
///
/// - `NotFound`: no such patient
/// - `InvalidField`: a proposed value failed coercion or validation
/// - `Persistence` / `Concurrency`: database error
///
/// Nothing is written when an error is returned.
pub fn patient_reconcile(
    conn: &mut Connection,
    patient_id: &str,
    proposed: &FieldMap,
) -> Result<Reconciliation> {
    log_op_start!("patient_reconcile", patient_id = patient_id);
    let start = std::time::Instant::now();

    let outcome = patient_reconcile_impl(conn, patient_id, proposed).map_err(|e| {
        log_op_error!(
            "patient_reconcile",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            patient_id = patient_id
        );
        e
    })?;

    log_op_end!(
        "patient_reconcile",
        duration_ms = start.elapsed().as_millis() as u64,
        patient_id = patient_id,
        changed_fields = outcome.audit_records.len(),
        risk_before = outcome.risk_before.risk_level.as_str(),
        risk_after = outcome.risk_after.risk_level.as_str()
    );

    Ok(outcome)
}

fn patient_reconcile_impl(
    conn: &mut Connection,
    patient_id: &str,
    proposed: &FieldMap,
) -> Result<Reconciliation> {
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(from_rusqlite)?;
    let outcome = {
        let mut store = SqlitePatientStore::new(&tx);
        ops::reconcile_patient(&mut store, patient_id, proposed)?
    };
    tx.commit().map_err(from_rusqlite)?;
    Ok(outcome)
}

/// A patient's audit trail grouped into update batches, newest first
///
/// ## Errors
///
/// - `NotFound`: no such patient
/// - `Persistence` / `Serialization`: database error or undecodable row
pub fn patient_history(conn: &Connection, patient_id: &str) -> Result<Vec<AuditBatch>> {
    log_op_start!("patient_history", patient_id = patient_id);
    let start = std::time::Instant::now();

    let store = SqlitePatientStore::new(conn);
    let batches = ops::patient_history(&store, patient_id).map_err(|e| {
        log_op_error!(
            "patient_history",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64,
            patient_id = patient_id
        );
        e
    })?;

    log_op_end!(
        "patient_history",
        duration_ms = start.elapsed().as_millis() as u64,
        patient_id = patient_id,
        batch_count = batches.len()
    );

    Ok(batches)
}

/// Delete a patient and its audit trail
///
/// ## Errors
///
/// - `NotFound`: no such patient
/// - `Persistence`: database error
pub fn patient_delete(conn: &Connection, patient_id: &str) -> Result<()> {
    log_op_start!("patient_delete", patient_id = patient_id);
    let start = std::time::Instant::now();

    SqlitePatientStore::new(conn)
        .delete_patient(patient_id)
        .map_err(|e| {
            log_op_error!(
                "patient_delete",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                patient_id = patient_id
            );
            e
        })?;

    log_op_end!(
        "patient_delete",
        duration_ms = start.elapsed().as_millis() as u64,
        patient_id = patient_id
    );

    Ok(())
}

/// Load one patient
pub fn patient_show(conn: &Connection, patient_id: &str) -> Result<PatientRecord> {
    SqlitePatientStore::new(conn).load(patient_id)
}

/// All patients, most recently created first
pub fn patient_list(conn: &Connection) -> Result<Vec<PatientRecord>> {
    SqlitePatientStore::new(conn).list_patients()
}

/// Every audit record across patients, newest first
pub fn audit_log(conn: &Connection) -> Result<Vec<AuditRecord>> {
    SqlitePatientStore::new(conn).audit_log_all()
}

/// Dashboard view: tier counts plus the latest admissions
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    #[serde(flatten)]
    pub summary: RiskSummary,
    pub recent_admissions: Vec<PatientRecord>,
}

/// Patient counts per risk tier and the `recent_limit` latest admissions
pub fn dashboard(conn: &Connection, recent_limit: u32) -> Result<Dashboard> {
    let store = SqlitePatientStore::new(conn);
    Ok(Dashboard {
        summary: store.risk_summary()?,
        recent_admissions: store.recent_admissions(recent_limit)?,
    })
}
