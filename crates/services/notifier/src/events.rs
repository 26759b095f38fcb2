//! The fixed table of notification events.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NotifyError;

/// Recipient address key, required by every event.
pub const VAR_EMAIL: &str = "email";

/// A notification the system knows how to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    EmailVerification,
    PasswordReset,
    AccountLocked,
    AccountUnlocked,
    RoleUpgrade,
    ProfessionalStatusUpgrade,
}

impl EventKind {
    /// Every supported event, in table order.
    pub const ALL: [EventKind; 6] = [
        EventKind::EmailVerification,
        EventKind::PasswordReset,
        EventKind::AccountLocked,
        EventKind::AccountUnlocked,
        EventKind::RoleUpgrade,
        EventKind::ProfessionalStatusUpgrade,
    ];

    /// Event identifier, also the template name.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::EmailVerification => "email_verification",
            EventKind::PasswordReset => "password_reset",
            EventKind::AccountLocked => "account_locked",
            EventKind::AccountUnlocked => "account_unlocked",
            EventKind::RoleUpgrade => "role_upgrade",
            EventKind::ProfessionalStatusUpgrade => "professional_status_upgrade",
        }
    }

    /// Fixed subject line.
    pub fn subject(&self) -> &'static str {
        match self {
            EventKind::EmailVerification => "Verify Your Account",
            EventKind::PasswordReset => "Password Reset Instructions",
            EventKind::AccountLocked => "Account Locked Notification",
            EventKind::AccountUnlocked => "Account Unlocked Notification",
            EventKind::RoleUpgrade => "Role Upgrade Notification",
            EventKind::ProfessionalStatusUpgrade => "Professional Status Upgrade Notification",
        }
    }

    /// Variables the body template substitutes, besides `email`.
    pub fn required_variables(&self) -> &'static [&'static str] {
        match self {
            EventKind::EmailVerification => &["name", "verification_url"],
            EventKind::PasswordReset => &["name", "reset_url"],
            EventKind::RoleUpgrade => &["name", "role"],
            EventKind::AccountLocked
            | EventKind::AccountUnlocked
            | EventKind::ProfessionalStatusUpgrade => &["name"],
        }
    }
}

impl FromStr for EventKind {
    type Err = NotifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| NotifyError::UnknownEventKind(s.to_string()))
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
