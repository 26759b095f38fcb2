//! User domain entity and related types.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{
    FIELD_ROLE, ROLE_ADMIN, ROLE_ANONYMOUS, ROLE_AUTHENTICATED, ROLE_MANAGER, VALID_ROLES,
};
use crate::error::ValidationError;

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Anonymous,
    Authenticated,
    Manager,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Anonymous => ROLE_ANONYMOUS,
            UserRole::Authenticated => ROLE_AUTHENTICATED,
            UserRole::Manager => ROLE_MANAGER,
            UserRole::Admin => ROLE_ADMIN,
        }
    }

    /// Privilege rank, higher is more privileged
    fn rank(&self) -> u8 {
        match self {
            UserRole::Anonymous => 0,
            UserRole::Authenticated => 1,
            UserRole::Manager => 2,
            UserRole::Admin => 3,
        }
    }

    /// Check if moving from `self` to `other` grants more privileges
    pub fn is_upgrade_to(&self, other: &UserRole) -> bool {
        other.rank() > self.rank()
    }
}

impl FromStr for UserRole {
    type Err = ValidationError;

    /// Parse a role name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let role = s.trim();
        [
            UserRole::Anonymous,
            UserRole::Authenticated,
            UserRole::Manager,
            UserRole::Admin,
        ]
        .into_iter()
        .find(|r| r.as_str().eq_ignore_ascii_case(role))
        .ok_or(ValidationError::InvalidEnum {
            field: FIELD_ROLE,
            allowed: VALID_ROLES,
        })
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw user creation payload, exactly as received from a client.
///
/// Every field is accepted as-is; [`crate::validation::validate_create`]
/// turns it into a [`UserRecord`] or a rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateUser {
    pub email: String,
    pub nickname: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub profile_picture_url: Option<String>,
    pub linkedin_profile_url: Option<String>,
    pub github_profile_url: Option<String>,
    pub is_professional: Option<bool>,
    pub role: Option<String>,
}

/// Registration payload: a user record plus the plain-text password.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterUser {
    #[serde(flatten)]
    pub user: CreateUser,
    #[serde(default)]
    pub password: String,
}

/// Raw partial update payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub nickname: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub profile_picture_url: Option<String>,
    pub linkedin_profile_url: Option<String>,
    pub github_profile_url: Option<String>,
    pub is_professional: Option<bool>,
    pub role: Option<String>,
}

/// Validated, normalized user record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub email: String,
    pub nickname: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub profile_picture_url: Option<String>,
    pub linkedin_profile_url: Option<String>,
    pub github_profile_url: Option<String>,
    pub is_professional: bool,
    pub role: UserRole,
}

/// Validated set of changes produced from an [`UpdateUser`].
///
/// `None` means "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserChanges {
    pub email: Option<String>,
    pub nickname: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub profile_picture_url: Option<String>,
    pub linkedin_profile_url: Option<String>,
    pub github_profile_url: Option<String>,
    pub is_professional: Option<bool>,
    pub role: Option<UserRole>,
}

/// User domain entity, as held by the storage collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub nickname: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub profile_picture_url: Option<String>,
    pub linkedin_profile_url: Option<String>,
    pub github_profile_url: Option<String>,
    pub role: UserRole,
    pub is_professional: bool,
    pub professional_status_updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub email_verified: bool,
    #[serde(skip_serializing)]
    pub verification_token: Option<String>,
    pub failed_login_attempts: u32,
    pub is_locked: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new, unverified user from a validated record
    pub fn new(
        id: Uuid,
        record: UserRecord,
        password_hash: String,
        verification_token: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            email: record.email,
            nickname: record.nickname,
            first_name: record.first_name,
            last_name: record.last_name,
            bio: record.bio,
            profile_picture_url: record.profile_picture_url,
            linkedin_profile_url: record.linkedin_profile_url,
            github_profile_url: record.github_profile_url,
            role: record.role,
            is_professional: record.is_professional,
            professional_status_updated_at: record.is_professional.then_some(now),
            password_hash,
            email_verified: false,
            verification_token: Some(verification_token),
            failed_login_attempts: 0,
            is_locked: false,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Display name used in notifications
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            _ => self.nickname.clone(),
        }
    }

    /// Apply a validated set of changes
    pub fn apply(&mut self, changes: UserChanges) {
        let UserChanges {
            email,
            nickname,
            first_name,
            last_name,
            bio,
            profile_picture_url,
            linkedin_profile_url,
            github_profile_url,
            is_professional,
            role,
        } = changes;

        if let Some(email) = email {
            self.email = email;
        }
        if let Some(nickname) = nickname {
            self.nickname = nickname;
        }
        if first_name.is_some() {
            self.first_name = first_name;
        }
        if last_name.is_some() {
            self.last_name = last_name;
        }
        if bio.is_some() {
            self.bio = bio;
        }
        if profile_picture_url.is_some() {
            self.profile_picture_url = profile_picture_url;
        }
        if linkedin_profile_url.is_some() {
            self.linkedin_profile_url = linkedin_profile_url;
        }
        if github_profile_url.is_some() {
            self.github_profile_url = github_profile_url;
        }
        if let Some(professional) = is_professional {
            self.set_professional(professional);
        }
        if let Some(role) = role {
            self.role = role;
        }
        self.updated_at = Utc::now();
    }

    /// Mark the email verified if `token` matches the issued one.
    ///
    /// Promotes an anonymous account to authenticated.
    pub fn verify_email(&mut self, token: &str) -> bool {
        if self.verification_token.as_deref() != Some(token) {
            return false;
        }
        self.email_verified = true;
        self.verification_token = None;
        if self.role == UserRole::Anonymous {
            self.role = UserRole::Authenticated;
        }
        self.updated_at = Utc::now();
        true
    }

    /// Require the (changed) email to be verified again with a fresh token.
    pub fn require_verification(&mut self, token: String) {
        self.email_verified = false;
        self.verification_token = Some(token);
        self.updated_at = Utc::now();
    }

    /// Record a failed login; returns true if this attempt locked the account.
    pub fn record_failed_login(&mut self, max_attempts: u32) -> bool {
        self.failed_login_attempts += 1;
        self.updated_at = Utc::now();
        if !self.is_locked && self.failed_login_attempts >= max_attempts {
            self.is_locked = true;
            return true;
        }
        false
    }

    /// Record a successful login
    pub fn record_login(&mut self) {
        let now = Utc::now();
        self.failed_login_attempts = 0;
        self.last_login_at = Some(now);
        self.updated_at = now;
    }

    /// Unlock the account and reset the failure counter
    pub fn unlock(&mut self) {
        self.is_locked = false;
        self.failed_login_attempts = 0;
        self.updated_at = Utc::now();
    }

    /// Update user's role
    pub fn update_role(&mut self, role: UserRole) {
        self.role = role;
        self.updated_at = Utc::now();
    }

    /// Update professional status, stamping the change time when it changes
    pub fn set_professional(&mut self, professional: bool) {
        let now = Utc::now();
        if self.is_professional != professional {
            self.professional_status_updated_at = Some(now);
        }
        self.is_professional = professional;
        self.updated_at = now;
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub nickname: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub bio: Option<String>,
    pub profile_picture_url: Option<String>,
    pub linkedin_profile_url: Option<String>,
    pub github_profile_url: Option<String>,
    pub role: UserRole,
    pub is_professional: bool,
    pub professional_status_updated_at: Option<DateTime<Utc>>,
    pub email_verified: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            nickname: user.nickname.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            bio: user.bio.clone(),
            profile_picture_url: user.profile_picture_url.clone(),
            linkedin_profile_url: user.linkedin_profile_url.clone(),
            github_profile_url: user.github_profile_url.clone(),
            role: user.role,
            is_professional: user.is_professional,
            professional_status_updated_at: user.professional_status_updated_at,
            email_verified: user.email_verified,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse::from(&user)
    }
}
