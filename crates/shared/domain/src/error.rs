//! Domain-level errors.
//!
//! These errors represent business rule violations and domain logic failures.
//! They are independent of infrastructure concerns (HTTP, SMTP, database).

use std::fmt;

use thiserror::Error;

/// A single rule violation found while validating user input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field value does not match its grammar
    #[error("{field}: {reason}")]
    InvalidFormat { field: &'static str, reason: String },

    /// Field value is not a member of a fixed set
    #[error("{field} must be one of: {}", .allowed.join(", "))]
    InvalidEnum {
        field: &'static str,
        allowed: &'static [&'static str],
    },

    /// Update payload carries no value at all
    #[error("At least one field must be provided for update")]
    EmptyUpdate,
}

impl ValidationError {
    pub fn invalid_format(field: &'static str, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field,
            reason: reason.into(),
        }
    }

    /// Field this violation refers to, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ValidationError::InvalidFormat { field, .. }
            | ValidationError::InvalidEnum { field, .. } => Some(field),
            ValidationError::EmptyUpdate => None,
        }
    }
}

/// Structured rejection: every violation found for one payload.
///
/// Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    errors: Vec<ValidationError>,
}

impl Rejection {
    pub(crate) fn from_errors(errors: Vec<ValidationError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self { errors })
        }
    }

    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Names of the offending fields, in the order they were checked.
    pub fn fields(&self) -> Vec<&'static str> {
        self.errors.iter().filter_map(ValidationError::field).collect()
    }

    /// True when some violation is an `InvalidFormat` on `field`.
    pub fn has_invalid_format(&self, field: &str) -> bool {
        self.errors
            .iter()
            .any(|e| matches!(e, ValidationError::InvalidFormat { field: f, .. } if *f == field))
    }

    /// True when some violation is an `InvalidEnum` on `field`.
    pub fn has_invalid_enum(&self, field: &str) -> bool {
        self.errors
            .iter()
            .any(|e| matches!(e, ValidationError::InvalidEnum { field: f, .. } if *f == field))
    }

    pub fn is_empty_update(&self) -> bool {
        self.errors.contains(&ValidationError::EmptyUpdate)
    }

    pub(crate) fn merge(mut self, other: Rejection) -> Self {
        self.errors.extend(other.errors);
        self
    }
}

impl From<ValidationError> for Rejection {
    fn from(err: ValidationError) -> Self {
        Self { errors: vec![err] }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for Rejection {}

/// Domain-specific errors for business rule violations.
#[derive(Error, Debug, Clone)]
pub enum DomainError {
    /// Input was rejected by the validator
    #[error("Validation error: {0}")]
    Rejected(#[from] Rejection),

    /// Password hashing or verification failed
    #[error("Password error: {0}")]
    Password(String),

    /// Internal domain error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Create a password error
    pub fn password(msg: impl Into<String>) -> Self {
        DomainError::Password(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        DomainError::Internal(msg.into())
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
