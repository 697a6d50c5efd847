use serde::{Deserialize, Serialize};

use super::value::FieldValue;

/// Value type of a patient field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Float,
    Boolean,
    Text,
    /// Optional calendar date (`YYYY-MM-DD`)
    Date,
    /// Ordered sequence of free-text items
    TextList,
}

/// How two values of a field are compared when diffing snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Direct inequality
    Scalar,
    /// Sort both sides, then compare; reordering alone is not a change
    Unordered,
}

/// Every editable field of a patient record
///
/// Declaration order is the canonical order used when emitting audit records
/// and when rendering snapshots back into a field map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    FullName,
    Age,
    Gender,
    ContactDetails,
    AdmissionDate,
    HeartRate,
    SystolicBp,
    Spo2,
    Temperature,
    RespiratoryRate,
    ChronicConditions,
    ErVisits,
    WbcFlag,
    CreatinineFlag,
    CrpFlag,
    Notes,
}

impl Field {
    /// All fields in canonical order
    pub const ALL: [Field; 16] = [
        Field::FullName,
        Field::Age,
        Field::Gender,
        Field::ContactDetails,
        Field::AdmissionDate,
        Field::HeartRate,
        Field::SystolicBp,
        Field::Spo2,
        Field::Temperature,
        Field::RespiratoryRate,
        Field::ChronicConditions,
        Field::ErVisits,
        Field::WbcFlag,
        Field::CreatinineFlag,
        Field::CrpFlag,
        Field::Notes,
    ];

    /// Machine name used as the key in field maps
    pub fn name(&self) -> &'static str {
        match self {
            Field::FullName => "full_name",
            Field::Age => "age",
            Field::Gender => "gender",
            Field::ContactDetails => "contact_details",
            Field::AdmissionDate => "admission_date",
            Field::HeartRate => "heart_rate",
            Field::SystolicBp => "systolic_bp",
            Field::Spo2 => "spo2",
            Field::Temperature => "temperature",
            Field::RespiratoryRate => "respiratory_rate",
            Field::ChronicConditions => "chronic_conditions",
            Field::ErVisits => "er_visits",
            Field::WbcFlag => "wbc_flag",
            Field::CreatinineFlag => "creatinine_flag",
            Field::CrpFlag => "crp_flag",
            Field::Notes => "notes",
        }
    }

    /// Human-readable label: the machine name title-cased (`heart_rate` → `Heart Rate`)
    pub fn label(&self) -> String {
        self.name()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.iter().copied().find(|f| f.name() == name)
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Field::FullName | Field::Gender | Field::ContactDetails | Field::Notes => {
                FieldKind::Text
            }
            Field::AdmissionDate => FieldKind::Date,
            Field::Age
            | Field::HeartRate
            | Field::SystolicBp
            | Field::Spo2
            | Field::RespiratoryRate
            | Field::ErVisits => FieldKind::Integer,
            Field::Temperature => FieldKind::Float,
            Field::ChronicConditions => FieldKind::TextList,
            Field::WbcFlag | Field::CreatinineFlag | Field::CrpFlag => FieldKind::Boolean,
        }
    }

    pub fn comparison(&self) -> Comparison {
        match self.kind() {
            FieldKind::TextList => Comparison::Unordered,
            _ => Comparison::Scalar,
        }
    }

    /// Free-text fields that must never appear in log output
    pub fn is_sensitive(&self) -> bool {
        matches!(self, Field::ContactDetails | Field::Notes)
    }

    /// Range and vocabulary checks applied on the strict (create/update) path
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when the value is outside the field's domain.
    pub fn validate(&self, value: &FieldValue) -> Result<(), String> {
        match (self, value) {
            (Field::Age, FieldValue::Integer(v)) if !(0..=120).contains(v) => {
                Err(format!("age must be between 0 and 120, got {}", v))
            }
            (Field::Spo2, FieldValue::Integer(v)) if !(0..=100).contains(v) => {
                Err(format!("spo2 must be between 0 and 100, got {}", v))
            }
            (
                Field::HeartRate | Field::SystolicBp | Field::RespiratoryRate | Field::ErVisits,
                FieldValue::Integer(v),
            ) if *v < 0 => Err(format!("{} cannot be negative, got {}", self.name(), v)),
            (Field::Temperature, FieldValue::Float(v)) if !v.is_finite() => {
                Err("temperature must be a finite number".to_string())
            }
            (Field::Gender, FieldValue::Text(g))
                if !g.is_empty() && !matches!(g.as_str(), "Male" | "Female" | "Other") =>
            {
                Err(format!(
                    "gender must be one of Male, Female, Other, got '{}'",
                    g
                ))
            }
            _ => Ok(()),
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
