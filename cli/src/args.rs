//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// usermgmt - validate user payloads and send account notifications
#[derive(Parser, Debug)]
#[command(name = "usermgmt")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a JSON user payload
    Validate(ValidateArgs),

    /// List notification events
    Events,

    /// Send a notification
    Notify(NotifyArgs),

    /// Register a user against an in-process store
    Register(RegisterArgs),

    /// Check the configured SMTP server answers
    CheckSmtp,
}

/// Which pipeline to run a payload through
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PayloadKind {
    Create,
    Update,
}

/// Arguments for the validate command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Payload kind
    #[arg(short, long, value_enum, default_value = "create")]
    pub kind: PayloadKind,

    /// JSON file to read; stdin when omitted or `-`
    pub file: Option<PathBuf>,
}

/// Arguments for the notify command
#[derive(Parser, Debug)]
pub struct NotifyArgs {
    /// Event identifier, e.g. `email_verification`
    pub event: String,

    /// Recipient address
    #[arg(long)]
    pub to: String,

    /// Template variable as `key=value`; repeatable
    #[arg(long = "var", value_parser = parse_var)]
    pub vars: Vec<(String, String)>,
}

/// Arguments for the register command
#[derive(Parser, Debug)]
pub struct RegisterArgs {
    /// Email address
    #[arg(long)]
    pub email: String,

    /// Plain-text password
    #[arg(long, env = "USERMGMT_PASSWORD")]
    pub password: String,

    /// Nickname; generated when omitted
    #[arg(long)]
    pub nickname: Option<String>,

    /// First name
    #[arg(long)]
    pub first_name: Option<String>,
}

fn parse_var(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))
}
