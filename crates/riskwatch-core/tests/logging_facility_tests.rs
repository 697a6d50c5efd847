#![allow(clippy::unwrap_used, clippy::expect_used)]

use riskwatch_core::errors::RiskWatchError;
use riskwatch_core::logging_facility::test_capture::init_test_capture;
use riskwatch_core::{log_op_end, log_op_error, log_op_start};
use riskwatch_core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    let start_events = capture.count_events(|e| {
        e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_START)
    });
    assert_eq!(start_events, 1);
}

#[test]
fn test_log_op_end_macro_records_duration() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let end_events: Vec<_> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END))
        .collect();
    assert_eq!(end_events.len(), 1, "Should have exactly one end event");
    assert_eq!(end_events[0].fields.get("duration_ms"), Some(&"42".to_string()));
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = RiskWatchError::PatientNotFound {
        patient_id: "p1".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 10);

    capture.assert_event_exists(op_name, EVENT_END_ERROR);
    let error_event = capture
        .events_for_op(op_name)
        .into_iter()
        .find(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .expect("Should have error event");
    assert_eq!(
        error_event.fields.get("err.code"),
        Some(&"ERR_NOT_FOUND".to_string())
    );
    assert_eq!(error_event.level, tracing::Level::ERROR);
}

#[test]
fn test_log_macros_with_extra_fields() {
    let capture = init_test_capture();
    let op_name = "test_log_macros_fields_unique_4";

    log_op_start!(op_name, patient_id = "p-123");
    log_op_end!(op_name, duration_ms = 1, changed_fields = 3);

    let events = capture.events_for_op(op_name);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].fields.get("patient_id"), Some(&"p-123".to_string()));
    assert_eq!(events[1].fields.get("changed_fields"), Some(&"3".to_string()));
}

#[test]
#[should_panic(expected = "Expected event")]
fn test_capture_assert_event_exists_fails() {
    let capture = init_test_capture();
    capture.assert_event_exists("nonexistent_op_truly_unique_999", EVENT_START);
}

#[test]
fn test_lenient_fallback_is_logged_without_echoing_free_text() {
    use riskwatch_core::model::{FieldMap, PatientSnapshot};
    use serde_json::json;

    // GIVEN a field map with an unreadable vital and unreadable notes
    let capture = init_test_capture();
    let fields: FieldMap = [
        ("spo2".to_string(), json!("n/a")),
        ("notes".to_string(), json!({"secret": "do not log"})),
    ]
    .into_iter()
    .collect();

    // WHEN it is read leniently
    let snapshot = PatientSnapshot::from_fields_lenient(&fields);

    // THEN both fields fall back to defaults and each fallback is logged
    assert_eq!(snapshot.spo2, 100);
    assert!(snapshot.notes.expose().is_empty());
    let fallbacks = |name: &str| {
        capture
            .events()
            .into_iter()
            .filter(|e| e.fields.get("field").map(String::as_str) == Some(name))
            .collect::<Vec<_>>()
    };
    let spo2 = fallbacks("spo2");
    assert!(!spo2.is_empty());
    assert!(spo2.iter().any(|e| e.fields.contains_key("error")));

    // AND the free-text fallback carries no error text
    let notes = fallbacks("notes");
    assert!(!notes.is_empty());
    assert!(notes.iter().all(|e| !e.fields.contains_key("error")));
}
