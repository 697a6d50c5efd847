use riskwatch_core_types::{RequestId, TraceId};
use thiserror::Error;

/// Result type alias using RiskWatchError
pub type Result<T> = std::result::Result<T, RiskWatchError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that collaborators (web layer,
/// CLI, tests) can match on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input
    InvalidField,

    // Records
    NotFound,
    AlreadyExists,

    // Integrity
    ConstraintViolation,
    ChecksumMismatch,

    // Integration/IO
    Io,
    Serialization,
    Persistence,
    Concurrency,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidField => "ERR_INVALID_FIELD",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::ConstraintViolation => "ERR_CONSTRAINT_VIOLATION",
            ExErrorKind::ChecksumMismatch => "ERR_CHECKSUM_MISMATCH",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Concurrency => "ERR_CONCURRENCY",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind plus optional context (operation, patient,
/// field, correlation ids) for programmatic handling and debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    patient_id: Option<String>,
    field: Option<String>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            patient_id: None,
            field: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add patient ID context
    pub fn with_patient_id(mut self, id: impl Into<String>) -> Self {
        self.patient_id = Some(id.into());
        self
    }

    /// Add field name context
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn patient_id(&self) -> Option<&str> {
        self.patient_id.as_deref()
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(patient_id) = &self.patient_id {
            write!(f, " (patient_id: {})", patient_id)?;
        }
        if let Some(field) = &self.field {
            write!(f, " (field: {})", field)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Domain error taxonomy for RiskWatch operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RiskWatchError {
    /// Patient record not present in the store
    #[error("Patient not found: {patient_id}")]
    PatientNotFound { patient_id: String },

    /// A record with this id was already persisted
    #[error("Patient already exists: {patient_id}")]
    PatientAlreadyExists { patient_id: String },

    /// A proposed value could not be coerced to the field's type or is out of range
    #[error("Invalid value for field {field}: {reason}")]
    InvalidFieldValue { field: String, reason: String },

    /// JSON encoding/decoding of a field map or list column failed
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl From<RiskWatchError> for ExError {
    fn from(err: RiskWatchError) -> Self {
        match err {
            RiskWatchError::PatientNotFound { patient_id } => ExError::new(ExErrorKind::NotFound)
                .with_patient_id(patient_id)
                .with_message("Patient not found"),

            RiskWatchError::PatientAlreadyExists { patient_id } => {
                ExError::new(ExErrorKind::AlreadyExists)
                    .with_patient_id(patient_id)
                    .with_message("Patient already exists")
            }

            RiskWatchError::InvalidFieldValue { field, reason } => {
                ExError::new(ExErrorKind::InvalidField)
                    .with_field(field)
                    .with_message(reason)
            }

            RiskWatchError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for RiskWatchError {
    fn from(err: serde_json::Error) -> Self {
        RiskWatchError::Serialization {
            message: err.to_string(),
        }
    }
}
