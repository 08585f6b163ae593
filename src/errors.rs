//! Error types for RadioHound records
//!
//! Error codes:
//! - RH_INVALID_FORMAT
//! - RH_EMPTY_PAYLOAD
//! - RH_DECODE_ERROR
//! - RH_UNKNOWN_VARIANT
//! - RH_RANGE_VIOLATION
//! - RH_MISSING_FIELD
//! - RH_UNEXPECTED_FIELD
//! - RH_TYPE_MISMATCH
//! - RH_NOT_FOUND
//! - RH_MISALIGNED_PAYLOAD
//!
//! A single construction attempt reports every failing field at once through
//! [`ValidationErrors`]; nothing stops at the first failure.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Kind of a single validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Pattern or shape mismatch (MAC address, version string, timestamp text)
    InvalidFormat,
    /// Payload is empty
    EmptyPayload,
    /// Payload is not valid base64
    DecodeError,
    /// Name not present in an enumeration or the element-type registry
    UnknownVariant,
    /// Numeric value or length outside declared bounds
    RangeViolation,
    /// Mandatory field absent
    MissingField,
    /// Key that is neither a named field nor routed to custom fields
    UnexpectedField,
    /// JSON value of the wrong type
    TypeMismatch,
    /// Load target absent
    NotFound,
    /// Payload length is not a multiple of the element width
    MisalignedPayload,
}

impl ErrorKind {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::InvalidFormat => "RH_INVALID_FORMAT",
            ErrorKind::EmptyPayload => "RH_EMPTY_PAYLOAD",
            ErrorKind::DecodeError => "RH_DECODE_ERROR",
            ErrorKind::UnknownVariant => "RH_UNKNOWN_VARIANT",
            ErrorKind::RangeViolation => "RH_RANGE_VIOLATION",
            ErrorKind::MissingField => "RH_MISSING_FIELD",
            ErrorKind::UnexpectedField => "RH_UNEXPECTED_FIELD",
            ErrorKind::TypeMismatch => "RH_TYPE_MISMATCH",
            ErrorKind::NotFound => "RH_NOT_FOUND",
            ErrorKind::MisalignedPayload => "RH_MISALIGNED_PAYLOAD",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A failed check on one scalar, before it is attached to a field.
///
/// Primitive validators return this; the record builder adds the field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Failure kind
    pub kind: ErrorKind,
    /// Expected type or condition
    pub expected: String,
    /// Actual value or type found
    pub actual: String,
}

impl Violation {
    pub fn new(kind: ErrorKind, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            kind,
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_format(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidFormat, expected, actual)
    }

    pub fn range(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::new(ErrorKind::RangeViolation, expected, actual)
    }

    pub fn unknown_variant(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownVariant, expected, actual)
    }

    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeMismatch, expected, actual)
    }

    /// Attaches this violation to a field path
    pub fn at(self, field: impl Into<String>) -> FieldError {
        FieldError {
            field: field.into(),
            kind: self.kind,
            expected: self.expected,
            actual: self.actual,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: expected {}, got {}", self.kind, self.expected, self.actual)
    }
}

/// Validation failure of one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field path (e.g., "metadata.fmin")
    pub field: String,
    /// Failure kind
    pub kind: ErrorKind,
    /// Expected type or condition
    pub expected: String,
    /// Actual value or type found
    pub actual: String,
}

impl FieldError {
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind: ErrorKind::MissingField,
            expected: "field to be present".into(),
            actual: "missing".into(),
        }
    }

    pub fn unexpected_field(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind: ErrorKind::UnexpectedField,
            expected: "no undeclared fields".into(),
            actual: "extra field present".into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] field '{}': expected {}, got {}",
            self.kind, self.field, self.expected, self.actual
        )
    }
}

/// All field failures of one construction attempt. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Wraps collected failures; `None` when there are none.
    pub fn from_vec(errors: Vec<FieldError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self { errors })
        }
    }

    pub fn single(error: FieldError) -> Self {
        Self {
            errors: vec![error],
        }
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the failure recorded for `field`, if any
    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.field == field)
    }

    /// Returns whether any failure of `kind` was recorded for `field`
    pub fn has(&self, field: &str, kind: ErrorKind) -> bool {
        self.errors.iter().any(|e| e.field == field && e.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} validation error(s)", self.errors.len())?;
        for err in &self.errors {
            write!(f, "\n  {}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Top-level error for record, registry and file operations
#[derive(Debug, Error)]
pub enum RhError {
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Element-type registry error: {0}")]
    Registry(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl RhError {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            RhError::Validation(_) => "RH_VALIDATION_FAILED",
            RhError::NotFound(_) => ErrorKind::NotFound.code(),
            RhError::Io { .. } => "RH_IO_ERROR",
            RhError::Json(_) => "RH_JSON_ERROR",
            RhError::Registry(_) => "RH_REGISTRY_ERROR",
            RhError::Config(_) => "RH_CONFIG_ERROR",
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        RhError::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns the field failures if this is a validation error
    pub fn validation(&self) -> Option<&ValidationErrors> {
        match self {
            RhError::Validation(errs) => Some(errs),
            _ => None,
        }
    }
}

/// Result type for RadioHound operations
pub type RhResult<T> = Result<T, RhError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(ErrorKind::InvalidFormat.code(), "RH_INVALID_FORMAT");
        assert_eq!(ErrorKind::EmptyPayload.code(), "RH_EMPTY_PAYLOAD");
        assert_eq!(ErrorKind::UnknownVariant.code(), "RH_UNKNOWN_VARIANT");
        assert_eq!(ErrorKind::MisalignedPayload.code(), "RH_MISALIGNED_PAYLOAD");
        assert_eq!(RhError::NotFound("x.rh".into()).code(), "RH_NOT_FOUND");
    }

    #[test]
    fn test_field_error_display() {
        let err = Violation::range("value > 0", "0").at("metadata.fmin");
        let display = format!("{}", err);
        assert!(display.contains("metadata.fmin"));
        assert!(display.contains("RH_RANGE_VIOLATION"));
        assert!(display.contains("value > 0"));
    }

    #[test]
    fn test_empty_list_is_not_an_error() {
        assert!(ValidationErrors::from_vec(Vec::new()).is_none());
    }

    #[test]
    fn test_validation_errors_lookup() {
        let errs = ValidationErrors::from_vec(vec![
            FieldError::missing_field("gain"),
            FieldError::unexpected_field("extra"),
        ])
        .unwrap();

        assert_eq!(errs.len(), 2);
        assert!(errs.has("gain", ErrorKind::MissingField));
        assert!(!errs.has("gain", ErrorKind::UnexpectedField));
        assert_eq!(errs.get("extra").unwrap().kind, ErrorKind::UnexpectedField);

        let display = RhError::from(errs).to_string();
        assert!(display.contains("2 validation error(s)"));
    }
}
