//! SQLite-backed patient store
//!
//! `SqlitePatientStore` borrows a connection. Pass a `Transaction` (it derefs
//! to `Connection`) to run several operations under one write lock; on a
//! plain connection, `commit` opens its own transaction.

#![allow(clippy::result_large_err)]

use riskwatch_core::audit::AuditRecord;
use riskwatch_core::errors::{ExError, RiskWatchError};
use riskwatch_core::model::PatientRecord;
use riskwatch_core::ops::PatientStore;
use riskwatch_core::RiskLevel;
use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use super::hydration::{
    encode_date, encode_timestamp, AuditRow, PatientRow, AUDIT_COLUMNS, PATIENT_COLUMNS,
};
use crate::errors::{from_rusqlite, Result};

/// Dashboard counts across all patients
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskSummary {
    pub total_patients: u32,
    pub high_risk: u32,
    pub medium_risk: u32,
    pub low_risk: u32,
}

/// How many patients the dashboard lists under recent admissions
pub const RECENT_ADMISSIONS_LIMIT: u32 = 5;

/// SQLite repository for patients and their audit trail
pub struct SqlitePatientStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqlitePatientStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// All patients, most recently created first
    pub fn list_patients(&self) -> Result<Vec<PatientRecord>> {
        let sql = format!(
            "SELECT {} FROM patients ORDER BY created_at DESC, id DESC",
            PATIENT_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql).map_err(from_rusqlite)?;
        let rows = stmt
            .query_map([], PatientRow::from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        rows.into_iter().map(PatientRow::into_record).collect()
    }

    /// Delete a patient; its audit trail goes with it
    ///
    /// # Errors
    ///
    /// `NotFound` when no such patient exists.
    pub fn delete_patient(&self, patient_id: &str) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM patients WHERE id = ?1", [patient_id])
            .map_err(from_rusqlite)?;
        if deleted == 0 {
            return Err(RiskWatchError::PatientNotFound {
                patient_id: patient_id.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Every audit record across patients, newest first
    pub fn audit_log_all(&self) -> Result<Vec<AuditRecord>> {
        let sql = format!(
            "SELECT {} FROM audit_log ORDER BY timestamp DESC, seq ASC",
            AUDIT_COLUMNS
        );
        self.query_audit(&sql, [])
    }

    /// Patient counts per risk tier
    pub fn risk_summary(&self) -> Result<RiskSummary> {
        let mut stmt = self
            .conn
            .prepare("SELECT risk_level, COUNT(*) FROM patients GROUP BY risk_level")
            .map_err(from_rusqlite)?;
        let counts = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?)))
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;

        let mut summary = RiskSummary::default();
        for (level, count) in counts {
            summary.total_patients += count;
            match level.parse::<RiskLevel>() {
                Ok(RiskLevel::High) => summary.high_risk += count,
                Ok(RiskLevel::Medium) => summary.medium_risk += count,
                Ok(RiskLevel::Low) => summary.low_risk += count,
                Err(reason) => tracing::debug!(%reason, "skipping unknown risk level"),
            }
        }
        Ok(summary)
    }

    /// Most recently admitted patients, up to `limit`
    ///
    /// Patients without an admission date sort last.
    pub fn recent_admissions(&self, limit: u32) -> Result<Vec<PatientRecord>> {
        let sql = format!(
            "SELECT {} FROM patients
             ORDER BY admission_date IS NULL, admission_date DESC, created_at DESC
             LIMIT ?1",
            PATIENT_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql).map_err(from_rusqlite)?;
        let rows = stmt
            .query_map([limit], PatientRow::from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        rows.into_iter().map(PatientRow::into_record).collect()
    }

    fn query_audit<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<AuditRecord>> {
        let mut stmt = self.conn.prepare(sql).map_err(from_rusqlite)?;
        let rows = stmt
            .query_map(params, AuditRow::from_row)
            .map_err(from_rusqlite)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(from_rusqlite)?;
        rows.into_iter().map(AuditRow::into_record).collect()
    }

    fn write_patient(conn: &Connection, record: &PatientRecord) -> Result<()> {
        let s = &record.snapshot;
        let conditions = serde_json::to_string(&s.chronic_conditions)
            .map_err(|e| ExError::from(RiskWatchError::from(e)).with_op("save_patient"))?;
        conn.execute(
            "INSERT INTO patients (id, full_name, age, gender, contact_details, admission_date,
                heart_rate, systolic_bp, spo2, temperature, respiratory_rate, chronic_conditions,
                er_visits, wbc_flag, creatinine_flag, crp_flag, notes, risk_score, risk_level,
                created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16,
                ?17, ?18, ?19, ?20, ?21)
             ON CONFLICT(id) DO UPDATE SET
                full_name = excluded.full_name,
                age = excluded.age,
                gender = excluded.gender,
                contact_details = excluded.contact_details,
                admission_date = excluded.admission_date,
                heart_rate = excluded.heart_rate,
                systolic_bp = excluded.systolic_bp,
                spo2 = excluded.spo2,
                temperature = excluded.temperature,
                respiratory_rate = excluded.respiratory_rate,
                chronic_conditions = excluded.chronic_conditions,
                er_visits = excluded.er_visits,
                wbc_flag = excluded.wbc_flag,
                creatinine_flag = excluded.creatinine_flag,
                crp_flag = excluded.crp_flag,
                notes = excluded.notes,
                risk_score = excluded.risk_score,
                risk_level = excluded.risk_level,
                updated_at = excluded.updated_at",
            rusqlite::params![
                record.id,
                s.full_name,
                s.age,
                s.gender,
                s.contact_details.expose(),
                encode_date(s.admission_date),
                s.heart_rate,
                s.systolic_bp,
                s.spo2,
                s.temperature,
                s.respiratory_rate,
                conditions,
                s.er_visits,
                s.wbc_flag,
                s.creatinine_flag,
                s.crp_flag,
                s.notes.expose(),
                record.risk_score,
                record.risk_level.as_str(),
                encode_timestamp(&record.created_at),
                encode_timestamp(&record.updated_at),
            ],
        )
        .map_err(from_rusqlite)?;
        Ok(())
    }

    fn write_audit(conn: &Connection, records: &[AuditRecord]) -> Result<()> {
        let mut stmt = conn
            .prepare(
                "INSERT INTO audit_log (id, patient_id, field_name, field_label, old_value,
                    new_value, risk_before, risk_after, score_before, score_after, reason,
                    batch_id, timestamp)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            )
            .map_err(from_rusqlite)?;
        for r in records {
            stmt.execute(rusqlite::params![
                r.id,
                r.patient_id,
                r.field_name,
                r.field_label,
                r.old_value,
                r.new_value,
                r.risk_before,
                r.risk_after.as_str(),
                r.score_before,
                r.score_after,
                r.reason,
                r.batch_id.map(|b| b.to_string()),
                encode_timestamp(&r.timestamp),
            ])
            .map_err(from_rusqlite)?;
        }
        Ok(())
    }
}

impl PatientStore for SqlitePatientStore<'_> {
    fn load(&self, patient_id: &str) -> Result<PatientRecord> {
        let sql = format!("SELECT {} FROM patients WHERE id = ?1", PATIENT_COLUMNS);
        let row = self
            .conn
            .query_row(&sql, [patient_id], PatientRow::from_row)
            .optional()
            .map_err(from_rusqlite)?;
        match row {
            Some(row) => row.into_record(),
            None => Err(RiskWatchError::PatientNotFound {
                patient_id: patient_id.to_string(),
            }
            .into()),
        }
    }

    fn save(&mut self, record: &PatientRecord) -> Result<()> {
        Self::write_patient(self.conn, record)
    }

    fn append_audit_records(&mut self, records: &[AuditRecord]) -> Result<()> {
        Self::write_audit(self.conn, records)
    }

    fn audit_trail(&self, patient_id: &str) -> Result<Vec<AuditRecord>> {
        let sql = format!(
            "SELECT {} FROM audit_log WHERE patient_id = ?1 ORDER BY timestamp DESC, seq ASC",
            AUDIT_COLUMNS
        );
        self.query_audit(&sql, [patient_id])
    }

    /// Write the record and its audit batch atomically
    ///
    /// Joins the caller's transaction when one is open.
    fn commit(&mut self, record: &PatientRecord, audit: &[AuditRecord]) -> Result<()> {
        if !self.conn.is_autocommit() {
            Self::write_patient(self.conn, record)?;
            return Self::write_audit(self.conn, audit);
        }
        let tx = self.conn.unchecked_transaction().map_err(from_rusqlite)?;
        Self::write_patient(&tx, record)?;
        Self::write_audit(&tx, audit)?;
        tx.commit().map_err(from_rusqlite)
    }
}
