use std::collections::HashMap;

use crate::audit::AuditRecord;
use crate::errors::{ExError, ExErrorKind, RiskWatchError};
use crate::model::PatientRecord;

/// Storage collaborator for patient records and their audit trail
///
/// The core never performs I/O itself; orchestration hands it a store.
/// Backends with transactions override [`PatientStore::commit`] so the record
/// and its audit batch land together.
pub trait PatientStore {
    /// Load a patient by id
    ///
    /// # Errors
    ///
    /// `NotFound` when no such patient exists, or a backend failure.
    fn load(&self, patient_id: &str) -> Result<PatientRecord, ExError>;

    /// Insert or replace a patient record
    ///
    /// # Errors
    ///
    /// Backend failure.
    fn save(&mut self, record: &PatientRecord) -> Result<(), ExError>;

    /// Append immutable audit records
    ///
    /// # Errors
    ///
    /// Backend failure.
    fn append_audit_records(&mut self, records: &[AuditRecord]) -> Result<(), ExError>;

    /// A patient's audit records, newest first; records of one batch keep
    /// their emission order
    ///
    /// # Errors
    ///
    /// Backend failure.
    fn audit_trail(&self, patient_id: &str) -> Result<Vec<AuditRecord>, ExError>;

    /// Persist an updated record together with its audit records
    ///
    /// # Errors
    ///
    /// Backend failure.
    fn commit(&mut self, record: &PatientRecord, audit: &[AuditRecord]) -> Result<(), ExError> {
        self.save(record)?;
        self.append_audit_records(audit)
    }

    /// Persist a brand-new record and its creation record
    ///
    /// # Errors
    ///
    /// `AlreadyExists` when the id is taken, or a backend failure.
    fn create(&mut self, record: &PatientRecord, creation: &AuditRecord) -> Result<(), ExError> {
        match self.load(&record.id) {
            Ok(_) => Err(RiskWatchError::PatientAlreadyExists {
                patient_id: record.id.clone(),
            }
            .into()),
            Err(e) if e.kind() == ExErrorKind::NotFound => {
                self.commit(record, std::slice::from_ref(creation))
            }
            Err(e) => Err(e),
        }
    }
}

/// In-memory store for embedding and tests
///
/// Not thread-safe; exclusive `&mut` access is what serializes reconciliations.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    patients: HashMap<String, PatientRecord>,
    audit_log: Vec<AuditRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn patient_count(&self) -> usize {
        self.patients.len()
    }

    /// Every audit record in insertion order
    pub fn audit_log(&self) -> &[AuditRecord] {
        &self.audit_log
    }
}

impl PatientStore for MemoryStore {
    fn load(&self, patient_id: &str) -> Result<PatientRecord, ExError> {
        self.patients.get(patient_id).cloned().ok_or_else(|| {
            RiskWatchError::PatientNotFound {
                patient_id: patient_id.to_string(),
            }
            .into()
        })
    }

    fn save(&mut self, record: &PatientRecord) -> Result<(), ExError> {
        self.patients.insert(record.id.clone(), record.clone());
        Ok(())
    }

    fn append_audit_records(&mut self, records: &[AuditRecord]) -> Result<(), ExError> {
        self.audit_log.extend_from_slice(records);
        Ok(())
    }

    fn audit_trail(&self, patient_id: &str) -> Result<Vec<AuditRecord>, ExError> {
        let mut trail: Vec<AuditRecord> = self
            .audit_log
            .iter()
            .filter(|r| r.patient_id == patient_id)
            .cloned()
            .collect();
        trail.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(trail)
    }
}
