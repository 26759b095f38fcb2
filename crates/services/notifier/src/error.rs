//! Error types for notification dispatch.

use common::AppError;
use thiserror::Error;

/// Result type for notification operations.
pub type NotifyResult<T> = Result<T, NotifyError>;

/// Errors returned by [`crate::Notifier::dispatch`].
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Requested event is not in the event table. A caller bug.
    #[error("Unknown notification event: {0}")]
    UnknownEventKind(String),

    /// Recipient data lacks a variable the template needs.
    #[error("Missing template variable: {0}")]
    MissingVariable(String),

    /// Template registration or rendering failed.
    #[error("Template error: {0}")]
    Template(String),

    /// The transport could not deliver the message.
    #[error("Delivery failed: {0}")]
    DeliveryFailed(#[from] DeliveryError),
}

/// Failures reported by a mail transport.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("invalid address '{address}': {reason}")]
    Address { address: String, reason: String },

    #[error("could not build message: {0}")]
    Message(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("delivery timed out")]
    Timeout,

    #[error("message rejected by server: {0}")]
    Rejected(String),
}

impl From<handlebars::RenderError> for NotifyError {
    fn from(err: handlebars::RenderError) -> Self {
        NotifyError::Template(err.to_string())
    }
}

impl From<handlebars::TemplateError> for NotifyError {
    fn from(err: handlebars::TemplateError) -> Self {
        NotifyError::Template(err.to_string())
    }
}

impl From<NotifyError> for AppError {
    fn from(err: NotifyError) -> Self {
        match err {
            NotifyError::UnknownEventKind(name) => AppError::UnknownEvent(name),
            NotifyError::MissingVariable(name) => {
                AppError::internal(format!("missing template variable {}", name))
            }
            NotifyError::Template(msg) => AppError::internal(msg),
            NotifyError::DeliveryFailed(err) => AppError::DeliveryFailed(err.to_string()),
        }
    }
}
