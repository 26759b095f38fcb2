//! SMTP configuration.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use common::config::{env_or, env_parse};
use tracing::warn;

/// Default submission port.
pub const DEFAULT_SMTP_PORT: u16 = 587;
/// Default connect/command timeout.
pub const DEFAULT_SMTP_TIMEOUT_SECS: u64 = 30;
/// Sender used when neither `SMTP_FROM` nor `SMTP_USERNAME` is set.
pub const DEFAULT_FROM_ADDRESS: &str = "noreply@example.com";

/// How the SMTP session is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TlsMode {
    /// Plain text session (local relays and test servers).
    None,
    /// Upgrade with STARTTLS after connecting.
    #[default]
    StartTls,
    /// TLS from the first byte.
    Tls,
}

impl FromStr for TlsMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "off" | "false" => Ok(TlsMode::None),
            "starttls" => Ok(TlsMode::StartTls),
            "tls" | "ssl" => Ok(TlsMode::Tls),
            other => Err(format!("unknown TLS mode: {}", other)),
        }
    }
}

/// SMTP server settings.
#[derive(Clone)]
pub struct SmtpConfig {
    pub server: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from_address: String,
    pub tls: TlsMode,
    pub timeout: Duration,
}

impl SmtpConfig {
    pub fn new(server: impl Into<String>, port: u16, from_address: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            port,
            username: None,
            password: None,
            from_address: from_address.into(),
            tls: TlsMode::default(),
            timeout: Duration::from_secs(DEFAULT_SMTP_TIMEOUT_SECS),
        }
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_tls(mut self, tls: TlsMode) -> Self {
        self.tls = tls;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load from environment variables.
    ///
    /// Returns `None` when `SMTP_SERVER` is unset or empty.
    pub fn from_env() -> Option<Self> {
        let server = std::env::var("SMTP_SERVER").ok().filter(|s| !s.trim().is_empty())?;
        let username = std::env::var("SMTP_USERNAME").ok().filter(|s| !s.is_empty());
        let password = std::env::var("SMTP_PASSWORD").ok().filter(|s| !s.is_empty());
        let from_address = std::env::var("SMTP_FROM")
            .ok()
            .filter(|s| !s.is_empty())
            .or_else(|| username.clone())
            .unwrap_or_else(|| DEFAULT_FROM_ADDRESS.to_string());

        Some(Self {
            server,
            port: env_parse("SMTP_PORT", DEFAULT_SMTP_PORT),
            username,
            password,
            from_address,
            tls: tls_mode_from_env(),
            timeout: Duration::from_secs(env_parse("SMTP_TIMEOUT_SECS", DEFAULT_SMTP_TIMEOUT_SECS)),
        })
    }
}

/// Read `SMTP_TLS`, warning and falling back to STARTTLS when unrecognized.
fn tls_mode_from_env() -> TlsMode {
    parse_tls_mode(&env_or("SMTP_TLS", "starttls"))
}

fn parse_tls_mode(raw: &str) -> TlsMode {
    raw.parse().unwrap_or_else(|e| {
        warn!(value = %raw, error = %e, "Unrecognized SMTP_TLS, using STARTTLS");
        TlsMode::default()
    })
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("from_address", &self.from_address)
            .field("tls", &self.tls)
            .field("timeout", &self.timeout)
            .finish()
    }
}
