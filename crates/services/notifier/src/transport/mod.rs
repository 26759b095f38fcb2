//! Mail transport adapters.
//!
//! A transport performs the actual delivery of a rendered message. The
//! notifier only ever sees the [`MailTransport`] trait.

mod log;
mod smtp;

pub use log::LogTransport;
pub use smtp::SmtpTransport;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::config::SmtpConfig;
use crate::error::DeliveryError;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Delivery capability: `deliver(subject, body, to) -> ok | error`.
///
/// Implementations own connection setup, authentication and timeouts, and
/// must release any connection they open before returning.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Deliver one HTML message to one recipient.
    async fn deliver(&self, subject: &str, body: &str, to: &str) -> Result<(), DeliveryError>;

    /// Transport name for logging.
    fn name(&self) -> &'static str;
}

/// Pick a transport from the environment.
///
/// Uses SMTP when `SMTP_SERVER` is set, otherwise logs messages instead of
/// sending them.
pub fn from_env() -> Arc<dyn MailTransport> {
    match SmtpConfig::from_env() {
        Some(config) => Arc::new(SmtpTransport::new(config)),
        None => {
            warn!("SMTP not configured - emails will be logged instead of sent");
            Arc::new(LogTransport)
        }
    }
}
