//! Common utilities shared across the user-management crates.
//!
//! This crate provides:
//! - Unified error handling with HTTP status mapping
//! - Shared configuration structures and environment helpers

pub mod config;
pub mod error;

pub use config::*;
pub use error::{AppError, AppResult, OptionExt};
