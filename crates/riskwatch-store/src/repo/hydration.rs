//! Hydration layer - converts SQLite rows into domain records
//!
//! Rows are read into plain column structs inside rusqlite's row closure,
//! then decoded (timestamps, enums, JSON lists) outside it so decode failures
//! surface as structured errors rather than rusqlite conversion errors.

#![allow(clippy::result_large_err)]

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use riskwatch_core::audit::AuditRecord;
use riskwatch_core::model::{PatientRecord, PatientSnapshot};
use riskwatch_core::RiskLevel;
use rusqlite::Row;
use uuid::Uuid;

use crate::errors::{corrupt_column, Result};

pub const PATIENT_COLUMNS: &str = "id, full_name, age, gender, contact_details, admission_date, \
     heart_rate, systolic_bp, spo2, temperature, respiratory_rate, chronic_conditions, \
     er_visits, wbc_flag, creatinine_flag, crp_flag, notes, risk_score, risk_level, \
     created_at, updated_at";

pub const AUDIT_COLUMNS: &str = "id, patient_id, field_name, field_label, old_value, new_value, \
     risk_before, risk_after, score_before, score_after, reason, batch_id, timestamp";

/// Fixed-width RFC 3339 with nanoseconds, so text order is time order
pub fn encode_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn decode_timestamp(column: &str, raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| corrupt_column(column, e))
}

pub fn encode_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format("%Y-%m-%d").to_string())
}

fn decode_level(column: &str, raw: &str) -> Result<RiskLevel> {
    raw.parse::<RiskLevel>()
        .map_err(|reason| corrupt_column(column, reason))
}

/// Raw `patients` row
pub struct PatientRow {
    id: String,
    full_name: String,
    age: i64,
    gender: String,
    contact_details: String,
    admission_date: Option<String>,
    heart_rate: i64,
    systolic_bp: i64,
    spo2: i64,
    temperature: f64,
    respiratory_rate: i64,
    chronic_conditions: String,
    er_visits: i64,
    wbc_flag: bool,
    creatinine_flag: bool,
    crp_flag: bool,
    notes: String,
    risk_score: u32,
    risk_level: String,
    created_at: String,
    updated_at: String,
}

impl PatientRow {
    /// Read a row selected with [`PATIENT_COLUMNS`]
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            full_name: row.get(1)?,
            age: row.get(2)?,
            gender: row.get(3)?,
            contact_details: row.get(4)?,
            admission_date: row.get(5)?,
            heart_rate: row.get(6)?,
            systolic_bp: row.get(7)?,
            spo2: row.get(8)?,
            temperature: row.get(9)?,
            respiratory_rate: row.get(10)?,
            chronic_conditions: row.get(11)?,
            er_visits: row.get(12)?,
            wbc_flag: row.get(13)?,
            creatinine_flag: row.get(14)?,
            crp_flag: row.get(15)?,
            notes: row.get(16)?,
            risk_score: row.get(17)?,
            risk_level: row.get(18)?,
            created_at: row.get(19)?,
            updated_at: row.get(20)?,
        })
    }

    pub fn into_record(self) -> Result<PatientRecord> {
        let admission_date = self
            .admission_date
            .as_deref()
            .map(|raw| {
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map_err(|e| corrupt_column("admission_date", e))
            })
            .transpose()?;
        let chronic_conditions: Vec<String> = serde_json::from_str(&self.chronic_conditions)
            .map_err(|e| corrupt_column("chronic_conditions", e))?;

        let snapshot = PatientSnapshot {
            full_name: self.full_name,
            age: self.age,
            gender: self.gender,
            contact_details: self.contact_details.into(),
            admission_date,
            heart_rate: self.heart_rate,
            systolic_bp: self.systolic_bp,
            spo2: self.spo2,
            temperature: self.temperature,
            respiratory_rate: self.respiratory_rate,
            chronic_conditions,
            er_visits: self.er_visits,
            wbc_flag: self.wbc_flag,
            creatinine_flag: self.creatinine_flag,
            crp_flag: self.crp_flag,
            notes: self.notes.into(),
        };

        Ok(PatientRecord {
            id: self.id,
            snapshot,
            risk_score: self.risk_score,
            risk_level: decode_level("risk_level", &self.risk_level)?,
            created_at: decode_timestamp("created_at", &self.created_at)?,
            updated_at: decode_timestamp("updated_at", &self.updated_at)?,
        })
    }
}

/// Raw `audit_log` row
pub struct AuditRow {
    id: String,
    patient_id: String,
    field_name: String,
    field_label: String,
    old_value: String,
    new_value: String,
    risk_before: String,
    risk_after: String,
    score_before: u32,
    score_after: u32,
    reason: String,
    batch_id: Option<String>,
    timestamp: String,
}

impl AuditRow {
    /// Read a row selected with [`AUDIT_COLUMNS`]
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            patient_id: row.get(1)?,
            field_name: row.get(2)?,
            field_label: row.get(3)?,
            old_value: row.get(4)?,
            new_value: row.get(5)?,
            risk_before: row.get(6)?,
            risk_after: row.get(7)?,
            score_before: row.get(8)?,
            score_after: row.get(9)?,
            reason: row.get(10)?,
            batch_id: row.get(11)?,
            timestamp: row.get(12)?,
        })
    }

    pub fn into_record(self) -> Result<AuditRecord> {
        let batch_id = self
            .batch_id
            .as_deref()
            .map(|raw| Uuid::parse_str(raw).map_err(|e| corrupt_column("batch_id", e)))
            .transpose()?;

        Ok(AuditRecord {
            id: self.id,
            patient_id: self.patient_id,
            field_name: self.field_name,
            field_label: self.field_label,
            old_value: self.old_value,
            new_value: self.new_value,
            risk_before: self.risk_before,
            risk_after: decode_level("risk_after", &self.risk_after)?,
            score_before: self.score_before,
            score_after: self.score_after,
            reason: self.reason,
            batch_id,
            timestamp: decode_timestamp("timestamp", &self.timestamp)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_text_orders_like_time() {
        let early = DateTime::<Utc>::from_timestamp(1_700_000_000, 5).unwrap();
        let late = DateTime::<Utc>::from_timestamp(1_700_000_000, 500_000_000).unwrap();
        assert!(encode_timestamp(&early) < encode_timestamp(&late));
        assert_eq!(
            decode_timestamp("t", &encode_timestamp(&early)).unwrap(),
            early
        );
    }

    #[test]
    fn test_bad_timestamp_names_column() {
        let err = decode_timestamp("updated_at", "yesterday").unwrap_err();
        assert_eq!(err.field(), Some("updated_at"));
    }
}
