//! Canonical schema constants for structured logging
//!
//! Every log event emitted through the logging macros uses these keys so
//! that log pipelines can filter on them without per-module knowledge.

pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_TRACE_ID: &str = "trace_id";

// Entity identifiers
pub const FIELD_PATIENT_ID: &str = "patient_id";
pub const FIELD_BATCH_ID: &str = "batch_id";

// Risk outcome
pub const FIELD_RISK_LEVEL: &str = "risk_level";
pub const FIELD_SCORE: &str = "score";
pub const FIELD_CHANGED_FIELDS: &str = "changed_fields";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_distinct() {
        assert_ne!(EVENT_START, EVENT_END);
        assert_ne!(EVENT_START, EVENT_END_ERROR);
        assert_ne!(EVENT_END, EVENT_END_ERROR);
    }

    #[test]
    fn test_entity_keys_do_not_collide_with_envelope_keys() {
        for key in [FIELD_PATIENT_ID, FIELD_BATCH_ID, FIELD_RISK_LEVEL, FIELD_SCORE] {
            assert_ne!(key, FIELD_COMPONENT);
            assert_ne!(key, FIELD_OP);
            assert_ne!(key, FIELD_EVENT);
        }
    }
}
