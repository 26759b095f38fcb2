//! Notification dispatch for account events.
//!
//! An event identifier plus recipient data goes in; one HTML email goes out
//! through a [`MailTransport`].
//!
//! ```ignore
//! let notifier = Notifier::new(notifier::transport::from_env())?;
//! let data = RecipientData::new("a@b.com")
//!     .with("name", "A")
//!     .with("verification_url", "http://x/y");
//! notifier.dispatch("email_verification", &data).await?;
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod notifier;
pub mod recipient;
pub mod templates;
pub mod transport;

pub use config::{SmtpConfig, TlsMode};
pub use error::{DeliveryError, NotifyError, NotifyResult};
pub use events::EventKind;
pub use notifier::{Delivery, Notifier};
pub use recipient::RecipientData;
pub use templates::{RenderedEmail, TemplateEngine};
pub use transport::{LogTransport, MailTransport, SmtpTransport};

#[cfg(any(test, feature = "test-utils"))]
pub use transport::MockMailTransport;
