//! Redaction wrapper for patient free text
//!
//! Contact details and clinical notes end up in `Debug` output whenever a
//! snapshot is logged or shown in a test failure. Wrapping them in
//! `Sensitive<T>` keeps them out of logs while still serializing the real
//! value to storage.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Wrapper whose `Debug` and `Display` never reveal the inner value
///
/// # Example
///
/// ```
/// use riskwatch_core_types::Sensitive;
///
/// let notes = Sensitive::new("lives alone, daughter visits weekly");
/// assert_eq!(format!("{:?}", notes), "***REDACTED***");
/// assert_eq!(notes.expose(), &"lives alone, daughter visits weekly");
/// ```
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Borrow the underlying value
    ///
    /// Callers that need the real text (persistence, diff display) use this;
    /// logging code must not.
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> From<T> for Sensitive<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***REDACTED***")
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***REDACTED***")
    }
}

impl<T: Serialize> Serialize for Sensitive<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Sensitive<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Self)
    }
}
