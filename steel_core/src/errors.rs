//! # Error Types
//!
//! Structured error types for steel_core. Every failure the engine can report
//! is a variant here, so callers (and the CLI's JSON output) can branch on the
//! kind of problem rather than parse strings.
//!
//! The variants fall into four groups:
//!
//! - **Configuration**: unknown design code, unknown design method, or a limit
//!   state the engine does not cover for a section type
//! - **Unit mismatch**: section, material and member disagree on unit system
//! - **Domain**: numeric nonsense (division by zero, non-finite results)
//! - **Input / lookup / I/O**: bad field values, missing shapes, unreadable files
//!
//! ## Example
//!
//! ```rust
//! use steel_core::errors::{CalcError, CalcResult};
//!
//! fn validate_length(length: f64) -> CalcResult<()> {
//!     if length < 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "length",
//!             length.to_string(),
//!             "Length cannot be negative",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate_length(-1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for steel_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for design-check operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, unparseable, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Design code identifier is not one the engine implements
    #[error("Invalid design code \"{code}\". Available codes: {available}")]
    InvalidDesignCode { code: String, available: String },

    /// Design method string is not one of nominal / LRFD / ASD
    #[error("Invalid design method \"{method}\". Available methods: {available}")]
    InvalidDesignMethod { method: String, available: String },

    /// The requested limit state is not implemented for this section type
    #[error("Unsupported check: {check} is not available for {section}")]
    UnsupportedCheck { check: String, section: String },

    /// Section, material and member reference different unit systems
    #[error("Unit mismatch: member uses '{member}', section uses '{section}', material uses '{material}'")]
    UnitMismatch {
        member: String,
        section: String,
        material: String,
    },

    /// A calculation would produce an undefined or non-finite result
    #[error("Domain error in {operation}: {reason}")]
    Domain { operation: String, reason: String },

    /// Shape designation not present in the section table
    #[error("Shape not found: {label}")]
    ShapeNotFound { label: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an InvalidDesignCode error
    pub fn invalid_design_code(code: impl Into<String>, available: &[&str]) -> Self {
        CalcError::InvalidDesignCode {
            code: code.into(),
            available: available.join(", "),
        }
    }

    /// Create an InvalidDesignMethod error
    pub fn invalid_design_method(method: impl Into<String>, available: &[&str]) -> Self {
        CalcError::InvalidDesignMethod {
            method: method.into(),
            available: available.join(", "),
        }
    }

    /// Create an UnsupportedCheck error
    pub fn unsupported_check(check: impl Into<String>, section: impl Into<String>) -> Self {
        CalcError::UnsupportedCheck {
            check: check.into(),
            section: section.into(),
        }
    }

    /// Create a UnitMismatch error
    pub fn unit_mismatch(member: impl Into<String>, section: impl Into<String>, material: impl Into<String>) -> Self {
        CalcError::UnitMismatch {
            member: member.into(),
            section: section.into(),
            material: material.into(),
        }
    }

    /// Create a Domain error
    pub fn domain(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::Domain {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Create a ShapeNotFound error
    pub fn shape_not_found(label: impl Into<String>) -> Self {
        CalcError::ShapeNotFound { label: label.into() }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl Into<String>) -> Self {
        CalcError::SerializationError { reason: reason.into() }
    }

    /// True for errors caused by an unrecognized code, method or check
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            CalcError::InvalidDesignCode { .. }
                | CalcError::InvalidDesignMethod { .. }
                | CalcError::UnsupportedCheck { .. }
        )
    }

    /// True for numeric domain failures
    pub fn is_domain(&self) -> bool {
        matches!(self, CalcError::Domain { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::InvalidDesignCode { .. } => "INVALID_DESIGN_CODE",
            CalcError::InvalidDesignMethod { .. } => "INVALID_DESIGN_METHOD",
            CalcError::UnsupportedCheck { .. } => "UNSUPPORTED_CHECK",
            CalcError::UnitMismatch { .. } => "UNIT_MISMATCH",
            CalcError::Domain { .. } => "DOMAIN_ERROR",
            CalcError::ShapeNotFound { .. } => "SHAPE_NOT_FOUND",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::domain("division", "divisor r is zero");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"Domain\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::shape_not_found("W99X1").error_code(), "SHAPE_NOT_FOUND");
        assert_eq!(
            CalcError::unit_mismatch("in-kip", "mm-kN", "in-kip").error_code(),
            "UNIT_MISMATCH"
        );
    }

    #[test]
    fn test_classification() {
        let method = CalcError::invalid_design_method("lsd", &["nominal", "lrfd", "asd"]);
        assert!(method.is_configuration());
        assert!(!method.is_domain());
        assert!(method.to_string().contains("nominal, lrfd, asd"));

        let domain = CalcError::domain("sqrt", "negative argument");
        assert!(domain.is_domain());
        assert!(!domain.is_configuration());
    }
}
