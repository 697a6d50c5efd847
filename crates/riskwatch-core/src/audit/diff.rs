use std::collections::BTreeSet;

use super::model::FieldChange;
use crate::model::{Field, FieldValue, PatientSnapshot};

/// Fields whose proposed value differs from the snapshot's current value
///
/// Each field is compared with its own semantics, so reordering a list field
/// is not a change. Changes keep the order of `proposed`, which
/// `parse_known_fields` yields in field catalogue order.
pub fn diff_fields(current: &PatientSnapshot, proposed: &[(Field, FieldValue)]) -> Vec<FieldChange> {
    proposed
        .iter()
        .filter_map(|(field, new)| {
            let old = current.get(*field);
            if old.equivalent(new, field.comparison()) {
                None
            } else {
                Some(FieldChange {
                    field: *field,
                    old,
                    new: new.clone(),
                })
            }
        })
        .collect()
}

/// Exact-string set delta between two reason lists
///
/// Returns `(added, removed)`: entries of `b` missing from `a`, then entries
/// of `a` missing from `b`. Each side keeps its list order and drops repeats.
pub fn set_delta(a: &[String], b: &[String]) -> (Vec<String>, Vec<String>) {
    let set_a: BTreeSet<&str> = a.iter().map(|s| s.as_str()).collect();
    let set_b: BTreeSet<&str> = b.iter().map(|s| s.as_str()).collect();
    (only_in(b, &set_a), only_in(a, &set_b))
}

fn only_in(items: &[String], other: &BTreeSet<&str>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    items
        .iter()
        .filter(|s| !other.contains(s.as_str()) && seen.insert(s.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_reorder_is_not_a_change() {
        let current = PatientSnapshot {
            chronic_conditions: strings(&["COPD", "Diabetes"]),
            ..PatientSnapshot::default()
        };
        let proposed = vec![(
            Field::ChronicConditions,
            FieldValue::TextList(strings(&["Diabetes", "COPD"])),
        )];
        assert!(diff_fields(&current, &proposed).is_empty());
    }

    #[test]
    fn test_scalar_change_detected() {
        let current = PatientSnapshot {
            heart_rate: 80,
            ..PatientSnapshot::default()
        };
        let proposed = vec![
            (Field::HeartRate, FieldValue::Integer(125)),
            (Field::Spo2, FieldValue::Integer(100)),
        ];
        let changes = diff_fields(&current, &proposed);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].field, Field::HeartRate);
        assert_eq!(changes[0].old_display(), "80");
        assert_eq!(changes[0].new_display(), "125");
    }

    #[test]
    fn test_changes_follow_field_catalogue_order() {
        let fields: crate::model::FieldMap = [
            ("crp_flag", serde_json::json!(true)),
            ("heart_rate", serde_json::json!(130)),
            ("full_name", serde_json::json!("Ada")),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        let proposed = crate::model::parse_known_fields(&fields).unwrap();

        let changes = diff_fields(&PatientSnapshot::default(), &proposed);

        let order: Vec<Field> = changes.iter().map(|c| c.field).collect();
        assert_eq!(order, vec![Field::FullName, Field::HeartRate, Field::CrpFlag]);
    }

    #[test]
    fn test_set_delta_band_shift_counts_both_ways() {
        let (added, removed) = set_delta(
            &strings(&["HR 100-120 (+1)", "High CRP (+1)"]),
            &strings(&["HR >120 (+2)", "High CRP (+1)"]),
        );
        assert_eq!(added, strings(&["HR >120 (+2)"]));
        assert_eq!(removed, strings(&["HR 100-120 (+1)"]));
    }

    #[test]
    fn test_set_delta_drops_repeats() {
        let (added, removed) = set_delta(
            &[],
            &strings(&["Chronic Condition: COPD (+1)", "Chronic Condition: COPD (+1)"]),
        );
        assert_eq!(added, strings(&["Chronic Condition: COPD (+1)"]));
        assert!(removed.is_empty());
    }
}
