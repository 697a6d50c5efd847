use proptest::prelude::*;
use riskwatch_core::{evaluate, PatientSnapshot};

const CONDITIONS: [&str; 6] = [
    "Diabetes",
    "COPD",
    "Cardiac arrhythmia",
    "Asthma",
    "  type 1 diabetes ",
    "Hypertension",
];

fn snapshot_strategy() -> impl Strategy<Value = PatientSnapshot> {
    (
        (0i64..=120, 0i64..=250, 0i64..=250, 0i64..=100),
        (340u32..=420, 0i64..=60, 0i64..=10),
        proptest::collection::vec(proptest::sample::select(CONDITIONS.to_vec()), 0..4),
        (any::<bool>(), any::<bool>(), any::<bool>()),
    )
        .prop_map(
            |((age, hr, bp, spo2), (temp_tenths, rr, er), conditions, (wbc, creat, crp))| {
                PatientSnapshot {
                    age,
                    heart_rate: hr,
                    systolic_bp: bp,
                    spo2,
                    temperature: f64::from(temp_tenths) / 10.0,
                    respiratory_rate: rr,
                    chronic_conditions: conditions.into_iter().map(String::from).collect(),
                    er_visits: er,
                    wbc_flag: wbc,
                    creatinine_flag: creat,
                    crp_flag: crp,
                    ..PatientSnapshot::default()
                }
            },
        )
}

proptest! {
    #[test]
    fn evaluation_is_deterministic(snapshot in snapshot_strategy()) {
        let first = evaluate(&snapshot);
        let second = evaluate(&snapshot.clone());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn tier_matches_score(snapshot in snapshot_strategy()) {
        let result = evaluate(&snapshot);
        let expected = match result.total_score {
            0..=2 => "LOW",
            3..=5 => "MEDIUM",
            _ => "HIGH",
        };
        prop_assert_eq!(result.risk_level.as_str(), expected);
    }

    #[test]
    fn raising_heart_rate_never_lowers_score(snapshot in snapshot_strategy(), bump in 0i64..100) {
        let before = evaluate(&snapshot).total_score;
        let worse = PatientSnapshot { heart_rate: snapshot.heart_rate + bump, ..snapshot };
        prop_assert!(evaluate(&worse).total_score >= before);
    }

    #[test]
    fn raising_age_never_lowers_score(snapshot in snapshot_strategy(), bump in 0i64..40) {
        let before = evaluate(&snapshot).total_score;
        let worse = PatientSnapshot { age: snapshot.age + bump, ..snapshot };
        prop_assert!(evaluate(&worse).total_score >= before);
    }

    #[test]
    fn raising_temperature_never_lowers_score(snapshot in snapshot_strategy(), bump in 0u32..30) {
        let before = evaluate(&snapshot).total_score;
        let worse = PatientSnapshot {
            temperature: snapshot.temperature + f64::from(bump) / 10.0,
            ..snapshot
        };
        prop_assert!(evaluate(&worse).total_score >= before);
    }

    #[test]
    fn lowering_spo2_never_lowers_score(snapshot in snapshot_strategy(), drop in 0i64..50) {
        let before = evaluate(&snapshot).total_score;
        let worse = PatientSnapshot { spo2: (snapshot.spo2 - drop).max(0), ..snapshot };
        prop_assert!(evaluate(&worse).total_score >= before);
    }

    #[test]
    fn lowering_recorded_bp_never_lowers_score(snapshot in snapshot_strategy(), drop in 0i64..100) {
        prop_assume!(snapshot.systolic_bp > 0);
        let before = evaluate(&snapshot).total_score;
        let worse = PatientSnapshot { systolic_bp: (snapshot.systolic_bp - drop).max(1), ..snapshot };
        prop_assert!(evaluate(&worse).total_score >= before);
    }

    #[test]
    fn more_er_visits_never_lower_score(snapshot in snapshot_strategy(), bump in 0i64..10) {
        let before = evaluate(&snapshot).total_score;
        let worse = PatientSnapshot { er_visits: snapshot.er_visits + bump, ..snapshot };
        prop_assert!(evaluate(&worse).total_score >= before);
    }

    #[test]
    fn setting_a_lab_flag_never_lowers_score(snapshot in snapshot_strategy()) {
        let before = evaluate(&snapshot).total_score;
        let worse = PatientSnapshot { creatinine_flag: true, ..snapshot };
        prop_assert!(evaluate(&worse).total_score >= before);
    }

    #[test]
    fn reason_count_bounded_by_score(snapshot in snapshot_strategy()) {
        let result = evaluate(&snapshot);
        prop_assert!(result.reasons.len() as u32 <= result.total_score);
    }
}
