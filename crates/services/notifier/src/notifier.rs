//! Event notification dispatch.

use std::sync::Arc;

use tracing::{error, info, instrument};

use crate::error::{NotifyError, NotifyResult};
use crate::events::EventKind;
use crate::recipient::RecipientData;
use crate::templates::TemplateEngine;
use crate::transport::MailTransport;

/// Record of a delivered notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub event: EventKind,
    pub to: String,
    pub subject: String,
}

/// Renders event templates and hands the result to a transport.
///
/// Holds no per-dispatch state, so clones can be shared across tasks and
/// concurrent dispatches never interleave their data.
#[derive(Clone)]
pub struct Notifier {
    templates: Arc<TemplateEngine>,
    transport: Arc<dyn MailTransport>,
}

impl Notifier {
    pub fn new(transport: Arc<dyn MailTransport>) -> NotifyResult<Self> {
        Ok(Self::with_templates(TemplateEngine::new()?, transport))
    }

    pub fn with_templates(templates: TemplateEngine, transport: Arc<dyn MailTransport>) -> Self {
        Self {
            templates: Arc::new(templates),
            transport,
        }
    }

    /// Name of the underlying transport.
    pub fn transport_name(&self) -> &'static str {
        self.transport.name()
    }

    /// Dispatch a notification by event identifier.
    ///
    /// An identifier outside the event table is rejected before anything is
    /// rendered or sent.
    pub async fn dispatch(&self, event: &str, data: &RecipientData) -> NotifyResult<Delivery> {
        let kind: EventKind = event.parse()?;
        self.dispatch_event(kind, data).await
    }

    /// Render and deliver one notification. Exactly one delivery attempt is
    /// made; failures are logged and returned, never retried here.
    #[instrument(skip(self, data), fields(transport = self.transport.name()))]
    pub async fn dispatch_event(&self, event: EventKind, data: &RecipientData) -> NotifyResult<Delivery> {
        let rendered = self.templates.render(event, data)?;
        let to = data
            .email()
            .ok_or_else(|| NotifyError::MissingVariable(crate::events::VAR_EMAIL.to_string()))?;

        match self.transport.deliver(&rendered.subject, &rendered.body, to).await {
            Ok(()) => {
                info!(event = %event, to = %to, "Notification sent");
                Ok(Delivery {
                    event,
                    to: to.to_string(),
                    subject: rendered.subject,
                })
            }
            Err(e) => {
                error!(event = %event, to = %to, error = %e, "Failed to send notification");
                Err(NotifyError::DeliveryFailed(e))
            }
        }
    }
}
