//! User service configuration.

use common::config::{env_or, env_parse};
use domain::DEFAULT_MAX_LOGIN_ATTEMPTS;

/// Default cap on a single page of `list_users`.
pub const DEFAULT_LIST_LIMIT: u64 = 100;

/// User service configuration.
#[derive(Debug, Clone)]
pub struct UserServiceConfig {
    /// Public base URL used to build links in emails
    pub server_base_url: String,
    /// Failed logins before the account is locked
    pub max_login_attempts: u32,
    /// Upper bound on the page size of `list_users`
    pub list_limit: u64,
}

impl UserServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_base_url: env_or("SERVER_BASE_URL", &defaults.server_base_url)
                .trim_end_matches('/')
                .to_string(),
            max_login_attempts: env_parse("MAX_LOGIN_ATTEMPTS", defaults.max_login_attempts),
            list_limit: env_parse("USER_LIST_LIMIT", defaults.list_limit),
        }
    }

    /// Link a user follows to verify their email address.
    pub fn verification_url(&self, user_id: &uuid::Uuid, token: &str) -> String {
        format!("{}/verify-email/{}/{}", self.server_base_url, user_id, token)
    }
}

impl Default for UserServiceConfig {
    fn default() -> Self {
        Self {
            server_base_url: "http://localhost:8000".to_string(),
            max_login_attempts: DEFAULT_MAX_LOGIN_ATTEMPTS,
            list_limit: DEFAULT_LIST_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_url() {
        let config = UserServiceConfig {
            server_base_url: "https://app.example.com".to_string(),
            ..Default::default()
        };
        let id = uuid::Uuid::nil();
        assert_eq!(
            config.verification_url(&id, "tok"),
            "https://app.example.com/verify-email/00000000-0000-0000-0000-000000000000/tok"
        );
    }

    #[test]
    fn test_defaults() {
        let config = UserServiceConfig::default();
        assert_eq!(config.max_login_attempts, 3);
        assert_eq!(config.list_limit, 100);
    }
}
