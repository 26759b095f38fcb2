//! SMTP transport using lettre.
//!
//! Every delivery builds its own session: connect, optional TLS upgrade,
//! authenticate, send, quit. Nothing is pooled, so the connection never
//! outlives the call.

use std::sync::Arc;

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{debug, info};

use super::MailTransport;
use crate::config::{SmtpConfig, TlsMode};
use crate::error::DeliveryError;

/// SMTP mail transport.
#[derive(Clone)]
pub struct SmtpTransport {
    config: Arc<SmtpConfig>,
}

impl SmtpTransport {
    /// Create a new SMTP transport. No connection is opened until delivery.
    pub fn new(config: SmtpConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Build a one-shot session based on configuration.
    fn build_session(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, DeliveryError> {
        let config = &self.config;
        let builder = match config.tls {
            TlsMode::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.server),
            TlsMode::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.server)
                .map_err(|e| DeliveryError::Transport(format!("Failed to create SMTP relay: {}", e)))?,
            TlsMode::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&config.server)
                .map_err(|e| DeliveryError::Transport(format!("Failed to create SMTP relay: {}", e)))?,
        };

        let mut builder = builder.port(config.port).timeout(Some(config.timeout));

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(builder.build())
    }

    /// Build a lettre Message.
    fn build_message(&self, subject: &str, body: &str, to: &str) -> Result<Message, DeliveryError> {
        let from: Mailbox = parse_mailbox(&self.config.from_address)?;
        let to: Mailbox = parse_mailbox(to)?;

        Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(body.to_string())
            .map_err(|e| DeliveryError::Message(e.to_string()))
    }

    /// Open a session and check the server answers.
    pub async fn health_check(&self) -> Result<bool, DeliveryError> {
        self.build_session()?
            .test_connection()
            .await
            .map_err(classify)
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, DeliveryError> {
    address.parse().map_err(|e: lettre::address::AddressError| DeliveryError::Address {
        address: address.to_string(),
        reason: e.to_string(),
    })
}

fn classify(err: lettre::transport::smtp::Error) -> DeliveryError {
    if err.is_timeout() {
        DeliveryError::Timeout
    } else if err.is_permanent() {
        DeliveryError::Rejected(err.to_string())
    } else {
        DeliveryError::Transport(err.to_string())
    }
}

#[async_trait]
impl MailTransport for SmtpTransport {
    async fn deliver(&self, subject: &str, body: &str, to: &str) -> Result<(), DeliveryError> {
        debug!(
            to = %to,
            subject = %subject,
            server = %self.config.server,
            port = %self.config.port,
            "Sending email via SMTP"
        );

        let message = self.build_message(subject, body, to)?;
        let session = self.build_session()?;

        let response = session.send(message).await.map_err(classify)?;

        info!(
            to = %to,
            code = %response.code(),
            "Email accepted by SMTP server"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}
