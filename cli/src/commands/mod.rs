//! Commands module - CLI command implementations.

pub mod check_smtp;
pub mod events;
pub mod notify;
pub mod register;
pub mod validate;
