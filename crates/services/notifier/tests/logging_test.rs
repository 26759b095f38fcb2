//! Diagnostic logging of failed deliveries.
//!
//! Lives in its own test binary so the thread-local subscriber installed
//! here only ever sees events from these tests.

use std::fmt;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use notifier::{DeliveryError, MailTransport, Notifier, NotifyError, RecipientData};

// =============================================================================
// Log Capture
// =============================================================================

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: Level,
    fields: Vec<(String, String)>,
}

impl CapturedEvent {
    fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Clone, Default)]
struct CaptureLayer {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl CaptureLayer {
    fn errors(&self) -> Vec<CapturedEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.level == Level::ERROR)
            .cloned()
            .collect()
    }
}

struct FieldVisitor<'a>(&'a mut Vec<(String, String)>);

impl Visit for FieldVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{:?}", value)));
    }
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = Vec::new();
        event.record(&mut FieldVisitor(&mut fields));
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            fields,
        });
    }
}

// =============================================================================
// Transport
// =============================================================================

struct RefusingTransport;

#[async_trait]
impl MailTransport for RefusingTransport {
    async fn deliver(&self, _subject: &str, _body: &str, _to: &str) -> Result<(), DeliveryError> {
        Err(DeliveryError::Transport("connection refused".into()))
    }

    fn name(&self) -> &'static str {
        "refusing"
    }
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_delivery_failure_logs_recipient_and_reason() {
    let capture = CaptureLayer::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    let _guard = tracing::subscriber::set_default(subscriber);

    let notifier = Notifier::new(Arc::new(RefusingTransport)).unwrap();
    let data = RecipientData::new("a@b.com").with("name", "A");
    let result = notifier.dispatch("account_locked", &data).await;

    assert!(matches!(result, Err(NotifyError::DeliveryFailed(_))));

    let errors = capture.errors();
    assert_eq!(errors.len(), 1);
    let event = &errors[0];
    assert_eq!(event.field("to"), Some("a@b.com"));
    assert_eq!(event.field("event"), Some("account_locked"));
    assert!(event
        .field("error")
        .is_some_and(|reason| reason.contains("connection refused")));
}

#[tokio::test]
async fn test_successful_delivery_logs_no_error() {
    struct AcceptingTransport;

    #[async_trait]
    impl MailTransport for AcceptingTransport {
        async fn deliver(&self, _: &str, _: &str, _: &str) -> Result<(), DeliveryError> {
            Ok(())
        }

        fn name(&self) -> &'static str {
            "accepting"
        }
    }

    let capture = CaptureLayer::default();
    let _guard = tracing::subscriber::set_default(tracing_subscriber::registry().with(capture.clone()));

    let notifier = Notifier::new(Arc::new(AcceptingTransport)).unwrap();
    let data = RecipientData::new("a@b.com").with("name", "A");
    assert!(notifier.dispatch("account_unlocked", &data).await.is_ok());

    assert!(capture.errors().is_empty());
}
