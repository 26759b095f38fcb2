//! Notify command - send one notification through the configured transport.
//!
//! ```bash
//! usermgmt notify account_locked --to a@b.com --var name=Ann
//! ```

use common::AppResult;
use notifier::{transport, Notifier, RecipientData};

use crate::args::NotifyArgs;

/// Execute the notify command
pub async fn execute(args: NotifyArgs) -> AppResult<()> {
    let notifier = Notifier::new(transport::from_env())?;

    let data = args
        .vars
        .into_iter()
        .fold(RecipientData::new(args.to), |data, (k, v)| data.with(k, v));

    let delivery = notifier.dispatch(&args.event, &data).await?;
    tracing::info!(
        event = %delivery.event,
        to = %delivery.to,
        transport = notifier.transport_name(),
        "Notification dispatched"
    );
    Ok(())
}
