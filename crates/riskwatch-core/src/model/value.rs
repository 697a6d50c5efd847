use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::field::{Comparison, FieldKind};

/// A typed value of one patient field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Text(String),
    Date(Option<NaiveDate>),
    TextList(Vec<String>),
}

impl FieldValue {
    /// Coerce a raw collaborator value into the given kind
    ///
    /// Accepts the loose shapes form and PDF layers produce (numeric strings,
    /// comma-separated lists, checkbox strings).
    ///
    /// # Errors
    ///
    /// Returns a reason string when the raw value cannot represent `kind`.
    pub fn coerce(kind: FieldKind, raw: &Value) -> Result<FieldValue, String> {
        match kind {
            FieldKind::Integer => coerce_integer(raw).map(FieldValue::Integer),
            FieldKind::Float => coerce_float(raw).map(FieldValue::Float),
            FieldKind::Boolean => coerce_bool(raw).map(FieldValue::Boolean),
            FieldKind::Text => coerce_text(raw).map(FieldValue::Text),
            FieldKind::Date => coerce_date(raw).map(FieldValue::Date),
            FieldKind::TextList => coerce_list(raw).map(FieldValue::TextList),
        }
    }

    /// Coerce for scoring, where any finite number stands in for an integer
    ///
    /// Fractional readings (`125.5`, `"80.0"`) are floored rather than
    /// rejected; other kinds coerce exactly as in [`FieldValue::coerce`].
    ///
    /// # Errors
    ///
    /// Returns a reason string when the raw value is not a number at all.
    pub fn coerce_lenient(kind: FieldKind, raw: &Value) -> Result<FieldValue, String> {
        match kind {
            FieldKind::Integer => coerce_integer(raw)
                .or_else(|_| coerce_float(raw).map(|f| f.floor() as i64))
                .map(FieldValue::Integer),
            _ => FieldValue::coerce(kind, raw),
        }
    }

    /// Display form used in audit records
    ///
    /// Lists are comma-joined with `None` standing in for an empty list; an
    /// unset date also renders as `None`.
    pub fn display(&self) -> String {
        match self {
            FieldValue::Integer(v) => v.to_string(),
            FieldValue::Float(v) => format_float(*v),
            FieldValue::Boolean(v) => v.to_string(),
            FieldValue::Text(v) => v.clone(),
            FieldValue::Date(Some(d)) => d.format("%Y-%m-%d").to_string(),
            FieldValue::Date(None) => "None".to_string(),
            FieldValue::TextList(items) if items.is_empty() => "None".to_string(),
            FieldValue::TextList(items) => items.join(", "),
        }
    }

    /// Render back into the collaborator's JSON shape
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Integer(v) => Value::from(*v),
            FieldValue::Float(v) => Value::from(*v),
            FieldValue::Boolean(v) => Value::Bool(*v),
            FieldValue::Text(v) => Value::String(v.clone()),
            FieldValue::Date(Some(d)) => Value::String(d.format("%Y-%m-%d").to_string()),
            FieldValue::Date(None) => Value::Null,
            FieldValue::TextList(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
        }
    }

    /// Whether two values are the same under the field's comparison semantics
    pub fn equivalent(&self, other: &FieldValue, comparison: Comparison) -> bool {
        match (comparison, self, other) {
            (Comparison::Unordered, FieldValue::TextList(a), FieldValue::TextList(b)) => {
                let mut a = a.clone();
                let mut b = b.clone();
                a.sort();
                b.sort();
                a == b
            }
            _ => self == other,
        }
    }
}

/// Floats keep one decimal when integral (`37.0`), otherwise shortest form (`38.5`)
fn format_float(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 {
        format!("{:.1}", v)
    } else {
        v.to_string()
    }
}

fn describe(raw: &Value) -> &'static str {
    match raw {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn coerce_integer(raw: &Value) -> Result<i64, String> {
    match raw {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
                _ => Err(format!("expected an integer, got {}", n)),
            }
        }
        Value::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| format!("expected an integer, got '{}'", s)),
        other => Err(format!("expected an integer, got {}", describe(other))),
    }
}

fn coerce_float(raw: &Value) -> Result<f64, String> {
    match raw {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| format!("expected a number, got {}", n)),
        Value::String(s) => s
            .trim()
            .replace(',', ".")
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .ok_or_else(|| format!("expected a number, got '{}'", s)),
        other => Err(format!("expected a number, got {}", describe(other))),
    }
}

fn coerce_bool(raw: &Value) -> Result<bool, String> {
    match raw {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(format!("expected a boolean, got {}", n)),
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "false" | "no" | "off" | "0" => Ok(false),
            _ => Err(format!("expected a boolean, got '{}'", s)),
        },
        other => Err(format!("expected a boolean, got {}", describe(other))),
    }
}

fn coerce_text(raw: &Value) -> Result<String, String> {
    match raw {
        Value::Null => Ok(String::new()),
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(format!("expected text, got {}", describe(other))),
    }
}

fn coerce_date(raw: &Value) -> Result<Option<NaiveDate>, String> {
    match raw {
        Value::Null => Ok(None),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| format!("expected a date as YYYY-MM-DD, got '{}'", s)),
        other => Err(format!("expected a date, got {}", describe(other))),
    }
}

fn coerce_list(raw: &Value) -> Result<Vec<String>, String> {
    match raw {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(format!(
                    "expected a list of strings, found {}",
                    describe(other)
                )),
            })
            .collect(),
        Value::String(s) => Ok(s
            .split([',', ';', '\n'])
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect()),
        other => Err(format!("expected a list, got {}", describe(other))),
    }
}
