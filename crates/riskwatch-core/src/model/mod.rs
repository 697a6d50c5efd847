pub mod field;
pub mod record;
pub mod snapshot;
pub mod value;

pub use field::{Comparison, Field, FieldKind};
pub use record::PatientRecord;
pub use snapshot::{parse_known_fields, FieldMap, PatientSnapshot};
pub use value::FieldValue;
