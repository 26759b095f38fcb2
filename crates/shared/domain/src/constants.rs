//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// User Roles
// =============================================================================

/// Role of a registered account whose email is not verified yet
pub const ROLE_ANONYMOUS: &str = "ANONYMOUS";

/// Role of a verified account
pub const ROLE_AUTHENTICATED: &str = "AUTHENTICATED";

/// Role with moderation privileges
pub const ROLE_MANAGER: &str = "MANAGER";

/// Administrator role with elevated privileges
pub const ROLE_ADMIN: &str = "ADMIN";

/// All valid role values
pub const VALID_ROLES: &[&str] = &[ROLE_ANONYMOUS, ROLE_AUTHENTICATED, ROLE_MANAGER, ROLE_ADMIN];

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Minimum nickname length, counted in characters
pub const MIN_NICKNAME_LENGTH: usize = 3;

// =============================================================================
// Field names (reported in rejections)
// =============================================================================

pub const FIELD_EMAIL: &str = "email";
pub const FIELD_PASSWORD: &str = "password";
pub const FIELD_NICKNAME: &str = "nickname";
pub const FIELD_ROLE: &str = "role";
pub const FIELD_PROFILE_PICTURE_URL: &str = "profile_picture_url";
pub const FIELD_LINKEDIN_PROFILE_URL: &str = "linkedin_profile_url";
pub const FIELD_GITHUB_PROFILE_URL: &str = "github_profile_url";

// =============================================================================
// Authentication
// =============================================================================

/// Failed logins allowed before an account is locked
pub const DEFAULT_MAX_LOGIN_ATTEMPTS: u32 = 3;
