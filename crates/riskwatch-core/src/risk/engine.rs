use super::model::{RiskLevel, RiskResult};
use super::rules::{scoring_condition, HISTORY, LAB_FLAGS, VITALS};
use crate::model::{FieldMap, PatientSnapshot};

/// Score a snapshot
///
/// Pure and total: every rule is evaluated, reasons come back in rule order.
pub fn evaluate(snapshot: &PatientSnapshot) -> RiskResult {
    let mut score = 0u32;
    let mut reasons = Vec::new();

    for category in VITALS {
        if let Some(band) = category.matching_band(snapshot) {
            score += band.points;
            reasons.push(band.reason.to_string());
        }
    }

    for condition in &snapshot.chronic_conditions {
        if let Some(text) = scoring_condition(condition) {
            score += 1;
            reasons.push(format!("Chronic Condition: {} (+1)", text));
        }
    }

    for category in HISTORY {
        if let Some(band) = category.matching_band(snapshot) {
            score += band.points;
            reasons.push(band.reason.to_string());
        }
    }

    for band in &LAB_FLAGS {
        if (band.matches)(snapshot) {
            score += band.points;
            reasons.push(band.reason.to_string());
        }
    }

    RiskResult {
        total_score: score,
        risk_level: RiskLevel::from_score(score),
        reasons,
        escalation_flag: false,
    }
}

/// Score a raw field map, defaulting anything missing or malformed
pub fn evaluate_fields(fields: &FieldMap) -> RiskResult {
    evaluate(&PatientSnapshot::from_fields_lenient(fields))
}
