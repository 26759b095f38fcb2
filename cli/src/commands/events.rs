//! Events command - print the notification event table.

use common::AppResult;
use notifier::EventKind;

/// Execute the events command
pub async fn execute() -> AppResult<()> {
    for line in event_table() {
        println!("{}", line);
    }
    Ok(())
}

fn event_table() -> Vec<String> {
    EventKind::ALL
        .iter()
        .map(|kind| {
            format!(
                "{:<30} {:<42} email, {}",
                kind.as_str(),
                kind.subject(),
                kind.required_variables().join(", ")
            )
        })
        .collect()
}
