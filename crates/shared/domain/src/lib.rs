//! Domain layer - User records, validation rules and collaborator traits.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! The validator lives in [`validation`]; nickname generation and password
//! hashing are the two collaborators it exposes as traits.

pub mod constants;
pub mod error;
pub mod nickname;
pub mod password;
pub mod user;
pub mod validation;

pub use constants::*;
pub use error::{DomainError, DomainResult, Rejection, ValidationError};
pub use nickname::{NicknameGenerator, RandomNickname};
pub use password::{Argon2Hasher, PasswordHasher};
pub use user::{
    CreateUser, RegisterUser, UpdateUser, User, UserChanges, UserRecord, UserResponse, UserRole,
};
pub use validation::{
    is_valid_email, is_valid_nickname, is_valid_url, validate_create, validate_registration,
    validate_update,
};
