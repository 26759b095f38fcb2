//! Business logic layer.

mod user_service;

pub use user_service::{UserManager, UserPage, UserService};
