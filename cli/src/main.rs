//! usermgmt - Application entry point
//!
//! CLI-based entry point that dispatches to the individual commands.

mod args;
mod commands;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use args::{Cli, Commands};
use common::ServiceConfig;

#[tokio::main]
async fn main() {
    common::load_dotenv();

    let cli = Cli::parse();
    let config = ServiceConfig::from_env();

    // Verbose mode forces debug level
    init_tracing(cli.verbose, &config.log_level);
    tracing::debug!(service = %config.service_name, "Configuration loaded");

    let result = match cli.command {
        Commands::Validate(args) => commands::validate::execute(args).await,
        Commands::Events => commands::events::execute().await,
        Commands::Notify(args) => commands::notify::execute(args).await,
        Commands::Register(args) => commands::register::execute(args).await,
        Commands::CheckSmtp => commands::check_smtp::execute().await,
    };

    if let Err(e) = result {
        match &e {
            common::AppError::Rejected(rejection) => {
                for error in rejection.errors() {
                    eprintln!("{}", error);
                }
            }
            _ => tracing::error!(code = e.code(), "Command failed: {}", e),
        }
        std::process::exit(1);
    }
}

/// Initialize tracing subscriber
fn init_tracing(verbose: bool, default_level: &str) {
    let filter = if verbose {
        "debug".to_string()
    } else {
        std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_string())
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();
}
