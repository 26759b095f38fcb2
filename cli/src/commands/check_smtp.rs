//! Check SMTP command - open a session against the configured server.

use common::{AppError, AppResult};
use notifier::{SmtpConfig, SmtpTransport};

/// Execute the check-smtp command
pub async fn execute() -> AppResult<()> {
    let config = SmtpConfig::from_env()
        .ok_or_else(|| AppError::bad_request("SMTP_SERVER is not set"))?;
    tracing::info!(?config, "Checking SMTP server");

    let transport = SmtpTransport::new(config);
    let reachable = transport
        .health_check()
        .await
        .map_err(|e| AppError::DeliveryFailed(e.to_string()))?;

    if !reachable {
        return Err(AppError::DeliveryFailed("server did not answer NOOP".to_string()));
    }
    tracing::info!("SMTP server is reachable");
    Ok(())
}
