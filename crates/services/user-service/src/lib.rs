//! User Service Library
//!
//! Account lifecycle on top of the domain validator: registration, login
//! with lockout, email verification and role/status changes. Each change
//! that concerns the account holder is followed by a notification.

pub mod config;
pub mod repository;
pub mod service;

pub use config::UserServiceConfig;
pub use repository::{InMemoryUserStore, UserRepository};
pub use service::{UserManager, UserPage, UserService};

#[cfg(any(test, feature = "test-utils"))]
pub use repository::MockUserRepository;
