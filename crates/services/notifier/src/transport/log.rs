//! Development transport that logs messages instead of sending them.

use async_trait::async_trait;
use tracing::info;

use super::MailTransport;
use crate::error::DeliveryError;

/// Logs every message and reports success.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTransport;

#[async_trait]
impl MailTransport for LogTransport {
    async fn deliver(&self, subject: &str, body: &str, to: &str) -> Result<(), DeliveryError> {
        info!(
            "=== EMAIL (not sent) ===\n\
             To: {}\n\
             Subject: {}\n\
             Body:\n{}\n\
             ========================",
            to, subject, body
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_transport_always_succeeds() {
        let transport = LogTransport;
        tokio_test::assert_ok!(transport.deliver("Subject", "<p>Body</p>", "a@b.com").await);
        assert_eq!(transport.name(), "log");
    }
}
