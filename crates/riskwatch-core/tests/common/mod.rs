use riskwatch_core::audit::create_with_risk;
use riskwatch_core::ops::PatientStore;
use riskwatch_core::{FieldMap, MemoryStore, PatientRecord};

/// Build a field map from a JSON object literal
#[allow(dead_code)]
pub fn fields(value: serde_json::Value) -> FieldMap {
    serde_json::from_value(value).unwrap()
}

/// Create a patient directly from a JSON object, without a store
#[allow(dead_code)]
pub fn patient(value: serde_json::Value) -> PatientRecord {
    create_with_risk(&fields(value)).unwrap().0
}

/// A memory store holding one patient (and its creation record); returns the id
#[allow(dead_code)]
pub fn seeded_store(value: serde_json::Value) -> (MemoryStore, String) {
    let mut store = MemoryStore::new();
    let (record, audit, _) = create_with_risk(&fields(value)).unwrap();
    store.create(&record, &audit).unwrap();
    (store, record.id)
}
