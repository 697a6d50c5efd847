use std::collections::BTreeMap;

use chrono::NaiveDate;
use riskwatch_core_types::Sensitive;
use serde::{Deserialize, Serialize};

use super::field::Field;
use super::value::FieldValue;
use crate::errors::{Result, RiskWatchError};

/// Flat field-name → value bag exchanged with ingestion and storage collaborators
pub type FieldMap = BTreeMap<String, serde_json::Value>;

/// A patient's editable fields at one point in time
///
/// Missing fields default to clinically safe values (`spo2 = 100`,
/// `temperature = 37.0`, everything else zero, false or empty) so a partial
/// snapshot always scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientSnapshot {
    pub full_name: String,
    pub age: i64,
    pub gender: String,
    pub contact_details: Sensitive<String>,
    pub admission_date: Option<NaiveDate>,

    pub heart_rate: i64,
    pub systolic_bp: i64,
    pub spo2: i64,
    pub temperature: f64,
    pub respiratory_rate: i64,

    pub chronic_conditions: Vec<String>,
    pub er_visits: i64,

    pub wbc_flag: bool,
    pub creatinine_flag: bool,
    pub crp_flag: bool,

    pub notes: Sensitive<String>,
}

impl Default for PatientSnapshot {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            age: 0,
            gender: String::new(),
            contact_details: Sensitive::default(),
            admission_date: None,
            heart_rate: 0,
            systolic_bp: 0,
            spo2: 100,
            temperature: 37.0,
            respiratory_rate: 0,
            chronic_conditions: Vec::new(),
            er_visits: 0,
            wbc_flag: false,
            creatinine_flag: false,
            crp_flag: false,
            notes: Sensitive::default(),
        }
    }
}

impl PatientSnapshot {
    /// Build a snapshot, substituting the default for any missing or
    /// uncoercible field. Never fails.
    pub fn from_fields_lenient(fields: &FieldMap) -> Self {
        let mut snapshot = Self::default();
        for field in Field::ALL {
            let Some(raw) = fields.get(field.name()) else {
                continue;
            };
            let outcome = FieldValue::coerce_lenient(field.kind(), raw)
                .map_err(invalid_value(field))
                .and_then(|value| snapshot.set(field, value));
            if let Err(err) = outcome {
                // Free-text reasons can echo the raw value
                if field.is_sensitive() {
                    tracing::debug!(
                        field = field.name(),
                        "falling back to default for uncoercible field"
                    );
                } else {
                    tracing::debug!(
                        field = field.name(),
                        error = %err,
                        "falling back to default for uncoercible field"
                    );
                }
            }
        }
        snapshot
    }

    /// Build a snapshot from a complete initial field map (creation path)
    ///
    /// Absent fields take their defaults; present fields must coerce and validate.
    ///
    /// # Errors
    ///
    /// `InvalidFieldValue` naming the first offending field in catalogue order.
    pub fn from_fields_strict(fields: &FieldMap) -> Result<Self> {
        let mut snapshot = Self::default();
        for (field, value) in parse_known_fields(fields)? {
            snapshot.set(field, value)?;
        }
        Ok(snapshot)
    }

    /// Read one field as a typed value
    pub fn get(&self, field: Field) -> FieldValue {
        match field {
            Field::FullName => FieldValue::Text(self.full_name.clone()),
            Field::Age => FieldValue::Integer(self.age),
            Field::Gender => FieldValue::Text(self.gender.clone()),
            Field::ContactDetails => FieldValue::Text(self.contact_details.expose().clone()),
            Field::AdmissionDate => FieldValue::Date(self.admission_date),
            Field::HeartRate => FieldValue::Integer(self.heart_rate),
            Field::SystolicBp => FieldValue::Integer(self.systolic_bp),
            Field::Spo2 => FieldValue::Integer(self.spo2),
            Field::Temperature => FieldValue::Float(self.temperature),
            Field::RespiratoryRate => FieldValue::Integer(self.respiratory_rate),
            Field::ChronicConditions => FieldValue::TextList(self.chronic_conditions.clone()),
            Field::ErVisits => FieldValue::Integer(self.er_visits),
            Field::WbcFlag => FieldValue::Boolean(self.wbc_flag),
            Field::CreatinineFlag => FieldValue::Boolean(self.creatinine_flag),
            Field::CrpFlag => FieldValue::Boolean(self.crp_flag),
            Field::Notes => FieldValue::Text(self.notes.expose().clone()),
        }
    }

    /// Write one field
    ///
    /// # Errors
    ///
    /// `InvalidFieldValue` if the value's variant does not match the field's kind.
    pub fn set(&mut self, field: Field, value: FieldValue) -> Result<()> {
        match (field, value) {
            (Field::FullName, FieldValue::Text(v)) => self.full_name = v,
            (Field::Age, FieldValue::Integer(v)) => self.age = v,
            (Field::Gender, FieldValue::Text(v)) => self.gender = v,
            (Field::ContactDetails, FieldValue::Text(v)) => self.contact_details = v.into(),
            (Field::AdmissionDate, FieldValue::Date(v)) => self.admission_date = v,
            (Field::HeartRate, FieldValue::Integer(v)) => self.heart_rate = v,
            (Field::SystolicBp, FieldValue::Integer(v)) => self.systolic_bp = v,
            (Field::Spo2, FieldValue::Integer(v)) => self.spo2 = v,
            (Field::Temperature, FieldValue::Float(v)) => self.temperature = v,
            (Field::RespiratoryRate, FieldValue::Integer(v)) => self.respiratory_rate = v,
            (Field::ChronicConditions, FieldValue::TextList(v)) => self.chronic_conditions = v,
            (Field::ErVisits, FieldValue::Integer(v)) => self.er_visits = v,
            (Field::WbcFlag, FieldValue::Boolean(v)) => self.wbc_flag = v,
            (Field::CreatinineFlag, FieldValue::Boolean(v)) => self.creatinine_flag = v,
            (Field::CrpFlag, FieldValue::Boolean(v)) => self.crp_flag = v,
            (Field::Notes, FieldValue::Text(v)) => self.notes = v.into(),
            (field, value) => {
                return Err(RiskWatchError::InvalidFieldValue {
                    field: field.name().to_string(),
                    reason: format!("expected {:?} value, got {:?}", field.kind(), value),
                })
            }
        }
        Ok(())
    }

    /// Render every field back into a flat field map
    pub fn to_field_map(&self) -> FieldMap {
        Field::ALL
            .iter()
            .map(|f| (f.name().to_string(), self.get(*f).to_json()))
            .collect()
    }
}

fn invalid_value(field: Field) -> impl FnOnce(String) -> RiskWatchError {
    move |reason| RiskWatchError::InvalidFieldValue {
        field: field.name().to_string(),
        reason,
    }
}

/// Strictly parse the known fields of a proposed field map, in catalogue order
///
/// Unknown keys (form tokens, computed risk columns) are skipped.
///
/// # Errors
///
/// `InvalidFieldValue` when a known field fails coercion or validation.
pub fn parse_known_fields(fields: &FieldMap) -> Result<Vec<(Field, FieldValue)>> {
    for key in fields.keys() {
        if Field::from_name(key).is_none() {
            tracing::debug!(key = %key, "ignoring unknown field in field map");
        }
    }

    let mut parsed = Vec::new();
    for field in Field::ALL {
        let Some(raw) = fields.get(field.name()) else {
            continue;
        };
        let value = FieldValue::coerce(field.kind(), raw)
            .and_then(|value| field.validate(&value).map(|_| value))
            .map_err(invalid_value(field))?;
        parsed.push((field, value));
    }
    Ok(parsed)
}
