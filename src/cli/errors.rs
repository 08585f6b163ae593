//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero exit after its JSON
//! envelope is written.

use std::fmt;
use std::io;

use serde_json::{json, Value};

use crate::errors::RhError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdout, output files)
    IoError,
    /// Self-test finished with failing samples
    SelfTestFailed,
    /// Error raised by the record library, carrying its own code
    Record(&'static str),
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "RH_CLI_CONFIG_ERROR",
            Self::IoError => "RH_CLI_IO_ERROR",
            Self::SelfTestFailed => "RH_CLI_SELF_TEST_FAILED",
            Self::Record(code) => code,
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
    details: Option<Value>,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Attach structured details to the error envelope
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Self-test failure
    pub fn self_test_failed(failed: usize, total: usize) -> Self {
        Self::new(
            CliErrorCode::SelfTestFailed,
            format!("{} of {} samples failed the self-test", failed, total),
        )
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<RhError> for CliError {
    fn from(e: RhError) -> Self {
        let err = Self::new(CliErrorCode::Record(e.code()), e.to_string());
        match e.validation() {
            Some(errs) => {
                let errors: Vec<Value> = errs
                    .iter()
                    .map(|fe| {
                        json!({
                            "field": fe.field,
                            "code": fe.kind.code(),
                            "expected": fe.expected,
                            "actual": fe.actual,
                        })
                    })
                    .collect();
                err.with_details(json!({ "errors": errors }))
            }
            None => err,
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{FieldError, ValidationErrors};

    #[test]
    fn test_codes() {
        assert_eq!(CliError::config_error("x").code_str(), "RH_CLI_CONFIG_ERROR");
        assert_eq!(CliError::self_test_failed(1, 2).code_str(), "RH_CLI_SELF_TEST_FAILED");
        let err = CliError::from(RhError::NotFound("a.rh".into()));
        assert_eq!(err.code_str(), "RH_NOT_FOUND");
        assert!(err.details().is_none());
    }

    #[test]
    fn test_validation_errors_become_details() {
        let errs = ValidationErrors::single(FieldError::missing_field("gain"));
        let err = CliError::from(RhError::from(errs));

        assert_eq!(err.code_str(), "RH_VALIDATION_FAILED");
        let details = err.details().unwrap();
        assert_eq!(details["errors"][0]["field"], "gain");
        assert_eq!(details["errors"][0]["code"], "RH_MISSING_FIELD");
    }
}
