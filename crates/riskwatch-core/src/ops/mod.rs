pub mod patient_ops;
pub mod store;

pub use patient_ops::{create_patient, patient_history, reconcile_patient};
pub use store::{MemoryStore, PatientStore};
