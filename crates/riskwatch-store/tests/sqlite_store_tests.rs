// Integration tests for SqlitePatientStore

#![allow(clippy::unwrap_used, clippy::expect_used)]

use riskwatch_core::audit::{create_with_risk, reconcile};
use riskwatch_core::ops::{create_patient, patient_history, reconcile_patient, PatientStore};
use riskwatch_core::{ExErrorKind, FieldMap, RiskLevel};
use riskwatch_store::{db, SqlitePatientStore};
use rusqlite::Connection;
use serde_json::json;

fn setup() -> Connection {
    db::open_and_migrate(":memory:").unwrap()
}

fn fields(value: serde_json::Value) -> FieldMap {
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_record_round_trips_every_field() {
    // Given: A fully populated patient
    let conn = setup();
    let mut store = SqlitePatientStore::new(&conn);
    let (record, creation, _) = create_with_risk(&fields(json!({
        "full_name": "Grace Hopper",
        "age": 79,
        "gender": "Female",
        "contact_details": "555-0100",
        "admission_date": "2025-03-04",
        "heart_rate": 104,
        "systolic_bp": 88,
        "spo2": 92,
        "temperature": 38.7,
        "respiratory_rate": 26,
        "chronic_conditions": ["COPD", "Diabetes Type 2"],
        "er_visits": 3,
        "wbc_flag": true,
        "creatinine_flag": false,
        "crp_flag": true,
        "notes": "Lives alone",
    })))
    .unwrap();

    // When: It is stored and loaded back
    store.create(&record, &creation).unwrap();
    let loaded = store.load(&record.id).unwrap();

    // Then: Nothing is lost, including sub-second timestamps
    assert_eq!(loaded, record);
    assert_eq!(store.audit_trail(&record.id).unwrap(), vec![creation]);
}

#[test]
fn test_load_missing_is_not_found() {
    let conn = setup();
    let store = SqlitePatientStore::new(&conn);

    let err = store.load("no-such-patient").unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::NotFound);
    assert_eq!(err.patient_id(), Some("no-such-patient"));
}

#[test]
fn test_reconcile_batch_keeps_emission_order() {
    // Given: A stored patient
    let conn = setup();
    let mut store = SqlitePatientStore::new(&conn);
    let (record, _, _) = create_patient(&mut store, &fields(json!({"age": 40}))).unwrap();

    // When: Three fields change in one update
    let out = reconcile_patient(
        &mut store,
        &record.id,
        &fields(json!({"crp_flag": true, "age": 77, "heart_rate": 121})),
    )
    .unwrap();

    // Then: The stored batch comes back in catalogue order, newest batch first
    let trail = store.audit_trail(&record.id).unwrap();
    assert_eq!(trail.len(), 4);
    assert_eq!(&trail[..3], &out.audit_records[..]);
    assert_eq!(trail[0].field_name, "age");
    assert_eq!(trail[1].field_name, "heart_rate");
    assert_eq!(trail[2].field_name, "crp_flag");
    assert_eq!(trail[3].field_name, "Patient Record");

    // And: History groups them into one batch
    let history = patient_history(&store, &record.id).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].changes.len(), 3);
    assert_eq!(history[0].risk_after, RiskLevel::Medium);
    assert_eq!(history[0].score_after, 5);
}

#[test]
fn test_delete_cascades_audit_trail() {
    let conn = setup();
    let mut store = SqlitePatientStore::new(&conn);
    let (record, _, _) = create_patient(&mut store, &fields(json!({"age": 70}))).unwrap();
    reconcile_patient(&mut store, &record.id, &fields(json!({"age": 71}))).unwrap();

    store.delete_patient(&record.id).unwrap();

    assert_eq!(store.load(&record.id).unwrap_err().kind(), ExErrorKind::NotFound);
    assert!(store.audit_trail(&record.id).unwrap().is_empty());
    assert_eq!(
        store.delete_patient(&record.id).unwrap_err().kind(),
        ExErrorKind::NotFound
    );
}

#[test]
fn test_audit_for_unknown_patient_violates_foreign_key() {
    let conn = setup();
    let mut store = SqlitePatientStore::new(&conn);
    let (record, creation, _) = create_with_risk(&fields(json!({}))).unwrap();

    // The record itself was never saved
    let err = store
        .append_audit_records(std::slice::from_ref(&creation))
        .unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::ConstraintViolation);
    assert!(store.load(&record.id).is_err());
}

#[test]
fn test_failed_commit_leaves_no_partial_write() {
    // Given: A stored patient and an update whose audit batch is broken
    let conn = setup();
    let mut store = SqlitePatientStore::new(&conn);
    let (record, creation, _) = create_patient(&mut store, &fields(json!({"age": 30}))).unwrap();
    let mut out = reconcile(&record, &fields(json!({"age": 31}))).unwrap();
    out.audit_records.push(creation); // duplicate id

    // When: Committing
    let err = store.commit(&out.record, &out.audit_records).unwrap_err();

    // Then: Neither the record nor the batch landed
    assert_eq!(err.kind(), ExErrorKind::ConstraintViolation);
    assert_eq!(store.load(&record.id).unwrap().snapshot.age, 30);
    assert_eq!(store.audit_trail(&record.id).unwrap().len(), 1);
}

#[test]
fn test_list_and_summary() {
    let conn = setup();
    let mut store = SqlitePatientStore::new(&conn);
    let (low, _, _) = create_patient(&mut store, &fields(json!({"full_name": "Low"}))).unwrap();
    create_patient(&mut store, &fields(json!({"full_name": "Mid", "age": 80, "wbc_flag": true}))).unwrap();
    let (high, _, _) = create_patient(
        &mut store,
        &fields(json!({"full_name": "High", "age": 80, "spo2": 85, "er_visits": 4})),
    )
    .unwrap();

    let patients = store.list_patients().unwrap();
    assert_eq!(patients.len(), 3);
    assert_eq!(patients[0].id, high.id);
    assert_eq!(patients[2].id, low.id);

    let summary = store.risk_summary().unwrap();
    assert_eq!(summary.total_patients, 3);
    assert_eq!(summary.high_risk, 1);
    assert_eq!(summary.medium_risk, 1);
    assert_eq!(summary.low_risk, 1);

    assert_eq!(store.audit_log_all().unwrap().len(), 3);
}

#[test]
fn test_empty_summary() {
    let conn = setup();
    let store = SqlitePatientStore::new(&conn);
    assert_eq!(store.risk_summary().unwrap().total_patients, 0);
    assert!(store.list_patients().unwrap().is_empty());
}

#[test]
fn test_recent_admissions_newest_first_undated_last() {
    // Given: Patients admitted on different days, one without a date
    let conn = setup();
    let mut store = SqlitePatientStore::new(&conn);
    for (name, date) in [
        ("Undated", serde_json::Value::Null),
        ("March", json!("2025-03-01")),
        ("January", json!("2025-01-15")),
        ("May", json!("2025-05-20")),
    ] {
        create_patient(
            &mut store,
            &fields(json!({"full_name": name, "admission_date": date})),
        )
        .unwrap();
    }

    // When: Asking for the three most recent admissions
    let recent = store.recent_admissions(3).unwrap();

    // Then: Dated patients come newest first and the limit applies
    let names: Vec<_> = recent.iter().map(|p| p.snapshot.full_name.as_str()).collect();
    assert_eq!(names, vec!["May", "March", "January"]);

    // And: The undated patient trails everyone else
    let all = store.recent_admissions(10).unwrap();
    assert_eq!(all.len(), 4);
    assert_eq!(all[3].snapshot.full_name, "Undated");
}
