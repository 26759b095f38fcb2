//! User service - Handles account lifecycle use cases.
//!
//! Every state change is persisted before its notification is dispatched.
//! A failed notification is logged and never undoes the change.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::{
    validate_registration, validate_update, Argon2Hasher, NicknameGenerator, PasswordHasher,
    RandomNickname, RegisterUser, UpdateUser, User, UserRole,
};
use notifier::{EventKind, Notifier, RecipientData};

use crate::config::UserServiceConfig;
use crate::repository::UserRepository;

/// One page of users plus the total number stored.
#[derive(Debug, Clone, Serialize)]
pub struct UserPage {
    pub users: Vec<User>,
    pub total: u64,
    pub skip: u64,
    pub limit: u64,
}

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Validate and store a new account, then send the verification email.
    ///
    /// New accounts always start as `ANONYMOUS`; a role in the payload is
    /// ignored.
    async fn register(&self, input: RegisterUser) -> AppResult<User>;

    /// Get user by ID
    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    /// List users; `limit` is capped by configuration
    async fn list_users(&self, skip: u64, limit: u64) -> AppResult<UserPage>;

    /// Apply a partial update.
    ///
    /// A role upgrade or newly granted professional status is notified the
    /// same way as the dedicated operations; a changed email must be verified
    /// again.
    async fn update_user(&self, id: Uuid, input: UpdateUser) -> AppResult<User>;

    /// Delete user
    async fn delete_user(&self, id: Uuid) -> AppResult<()>;

    /// Check credentials, tracking failures and locking the account
    async fn login(&self, email: &str, password: &str) -> AppResult<User>;

    /// Confirm an email address with the token sent at registration
    async fn verify_email(&self, id: Uuid, token: &str) -> AppResult<User>;

    /// Unlock a locked account
    async fn unlock_user(&self, id: Uuid) -> AppResult<User>;

    /// Change a user's role
    async fn change_role(&self, id: Uuid, role: &str) -> AppResult<User>;

    /// Grant or revoke professional status
    async fn set_professional_status(&self, id: Uuid, professional: bool) -> AppResult<User>;
}

/// Concrete implementation of UserService using repository.
pub struct UserManager {
    repo: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    nicknames: Arc<dyn NicknameGenerator>,
    notifier: Notifier,
    config: UserServiceConfig,
}

impl UserManager {
    /// Create a user service with Argon2 hashing and random nicknames
    pub fn new(repo: Arc<dyn UserRepository>, notifier: Notifier, config: UserServiceConfig) -> Self {
        Self {
            repo,
            hasher: Arc::new(Argon2Hasher),
            nicknames: Arc::new(RandomNickname),
            notifier,
            config,
        }
    }

    pub fn with_password_hasher(mut self, hasher: Arc<dyn PasswordHasher>) -> Self {
        self.hasher = hasher;
        self
    }

    pub fn with_nickname_generator(mut self, nicknames: Arc<dyn NicknameGenerator>) -> Self {
        self.nicknames = nicknames;
        self
    }

    async fn find(&self, id: Uuid) -> AppResult<User> {
        self.repo.find_by_id(id).await?.ok_or_not_found()
    }

    async fn ensure_email_free(&self, email: &str, owner: Option<Uuid>) -> AppResult<()> {
        match self.repo.find_by_email(email).await? {
            Some(existing) if Some(existing.id) != owner => Err(AppError::conflict("User with this email")),
            _ => Ok(()),
        }
    }

    async fn ensure_nickname_free(&self, nickname: &str, owner: Option<Uuid>) -> AppResult<()> {
        match self.repo.find_by_nickname(nickname).await? {
            Some(existing) if Some(existing.id) != owner => Err(AppError::conflict("User with this nickname")),
            _ => Ok(()),
        }
    }

    /// Dispatch a notification about `user`. Failures are logged only.
    async fn notify(&self, event: EventKind, user: &User, extra: &[(&str, String)]) {
        let mut data = RecipientData::new(user.email.clone()).with("name", user.display_name());
        for (key, value) in extra {
            data.insert(*key, value.clone());
        }

        if let Err(e) = self.notifier.dispatch_event(event, &data).await {
            warn!(
                user_id = %user.id,
                event = %event,
                error = %e,
                "Notification not delivered"
            );
        }
    }
}

#[async_trait]
impl UserService for UserManager {
    async fn register(&self, mut input: RegisterUser) -> AppResult<User> {
        input.user.role = Some(UserRole::Anonymous.to_string());
        let record = validate_registration(&input, self.nicknames.as_ref())?;

        self.ensure_email_free(&record.email, None).await?;
        self.ensure_nickname_free(&record.nickname, None).await?;

        let password_hash = self.hasher.hash(&input.password)?;
        let token = Uuid::new_v4().to_string();
        let user = self
            .repo
            .create(User::new(Uuid::new_v4(), record, password_hash, token.clone()))
            .await?;

        info!(user_id = %user.id, nickname = %user.nickname, "User registered");

        let verification_url = self.config.verification_url(&user.id, &token);
        self.notify(
            EventKind::EmailVerification,
            &user,
            &[("verification_url", verification_url)],
        )
        .await;

        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.find(id).await
    }

    async fn list_users(&self, skip: u64, limit: u64) -> AppResult<UserPage> {
        let limit = limit.min(self.config.list_limit);
        let users = self.repo.list(skip, limit).await?;
        let total = self.repo.count().await?;
        Ok(UserPage {
            users,
            total,
            skip,
            limit,
        })
    }

    async fn update_user(&self, id: Uuid, input: UpdateUser) -> AppResult<User> {
        let changes = validate_update(&input)?;
        let mut user = self.find(id).await?;

        if let Some(email) = &changes.email {
            self.ensure_email_free(email, Some(id)).await?;
        }
        if let Some(nickname) = &changes.nickname {
            self.ensure_nickname_free(nickname, Some(id)).await?;
        }

        let previous_role = user.role;
        let was_professional = user.is_professional;
        let email_changed = changes
            .email
            .as_deref()
            .is_some_and(|email| !email.eq_ignore_ascii_case(&user.email));

        user.apply(changes);
        let token = email_changed.then(|| Uuid::new_v4().to_string());
        if let Some(token) = &token {
            user.require_verification(token.clone());
        }
        let user = self.repo.update(user).await?;

        if let Some(token) = token {
            info!(user_id = %user.id, "Email changed, verification required");
            let verification_url = self.config.verification_url(&user.id, &token);
            self.notify(
                EventKind::EmailVerification,
                &user,
                &[("verification_url", verification_url)],
            )
            .await;
        }
        if previous_role.is_upgrade_to(&user.role) {
            self.notify(EventKind::RoleUpgrade, &user, &[("role", user.role.to_string())])
                .await;
        }
        if user.is_professional && !was_professional {
            self.notify(EventKind::ProfessionalStatusUpgrade, &user, &[]).await;
        }
        Ok(user)
    }

    async fn delete_user(&self, id: Uuid) -> AppResult<()> {
        self.repo.delete(id).await?;
        info!(user_id = %id, "User deleted");
        Ok(())
    }

    async fn login(&self, email: &str, password: &str) -> AppResult<User> {
        let mut user = self
            .repo
            .find_by_email(email.trim())
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if user.is_locked {
            return Err(AppError::AccountLocked);
        }

        if !self.hasher.verify(password, &user.password_hash) {
            let locked = user.record_failed_login(self.config.max_login_attempts);
            let user = self.repo.update(user).await?;
            if locked {
                warn!(user_id = %user.id, attempts = user.failed_login_attempts, "Account locked");
                self.notify(EventKind::AccountLocked, &user, &[]).await;
            }
            return Err(AppError::InvalidCredentials);
        }

        if !user.email_verified {
            return Err(AppError::forbidden("Email not verified"));
        }

        user.record_login();
        let user = self.repo.update(user).await?;
        info!(user_id = %user.id, "User logged in");
        Ok(user)
    }

    async fn verify_email(&self, id: Uuid, token: &str) -> AppResult<User> {
        let mut user = self.find(id).await?;

        if user.email_verified {
            return Ok(user);
        }
        if !user.verify_email(token) {
            return Err(AppError::bad_request("Invalid or expired verification token"));
        }

        let user = self.repo.update(user).await?;
        info!(user_id = %user.id, role = %user.role, "Email verified");
        Ok(user)
    }

    async fn unlock_user(&self, id: Uuid) -> AppResult<User> {
        let mut user = self.find(id).await?;
        user.unlock();
        let user = self.repo.update(user).await?;

        info!(user_id = %user.id, "Account unlocked");
        self.notify(EventKind::AccountUnlocked, &user, &[]).await;
        Ok(user)
    }

    async fn change_role(&self, id: Uuid, role: &str) -> AppResult<User> {
        let role: UserRole = role.parse().map_err(domain::Rejection::from)?;
        let mut user = self.find(id).await?;
        let previous = user.role;

        user.update_role(role);
        let user = self.repo.update(user).await?;

        info!(user_id = %user.id, from = %previous, to = %role, "Role changed");
        if previous.is_upgrade_to(&role) {
            self.notify(EventKind::RoleUpgrade, &user, &[("role", role.to_string())])
                .await;
        }
        Ok(user)
    }

    async fn set_professional_status(&self, id: Uuid, professional: bool) -> AppResult<User> {
        let mut user = self.find(id).await?;
        let granted = professional && !user.is_professional;

        user.set_professional(professional);
        let user = self.repo.update(user).await?;

        if granted {
            info!(user_id = %user.id, "Professional status granted");
            self.notify(EventKind::ProfessionalStatusUpgrade, &user, &[]).await;
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockUserRepository;
    use domain::{CreateUser, UserRecord};
    use notifier::{DeliveryError, MockMailTransport};

    fn stored_user(locked: bool) -> User {
        let record = UserRecord {
            email: "a@b.com".to_string(),
            nickname: "abc".to_string(),
            first_name: Some("A".to_string()),
            last_name: None,
            bio: None,
            profile_picture_url: None,
            linkedin_profile_url: None,
            github_profile_url: None,
            is_professional: false,
            role: UserRole::Authenticated,
        };
        let mut user = User::new(Uuid::new_v4(), record, "digest".to_string(), "token".to_string());
        user.is_locked = locked;
        user
    }

    fn failing_notifier() -> Notifier {
        let mut transport = MockMailTransport::new();
        transport.expect_name().return_const("mock");
        transport
            .expect_deliver()
            .returning(|_, _, _| Err(DeliveryError::Timeout));
        Notifier::new(Arc::new(transport)).unwrap()
    }

    fn silent_notifier() -> Notifier {
        let mut transport = MockMailTransport::new();
        transport.expect_name().return_const("mock");
        transport.expect_deliver().times(0);
        Notifier::new(Arc::new(transport)).unwrap()
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let service = UserManager::new(Arc::new(repo), silent_notifier(), UserServiceConfig::default());
        let result = service.get_user(Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_list_caps_limit_and_reports_total() {
        let mut repo = MockUserRepository::new();
        repo.expect_list()
            .withf(|skip, limit| *skip == 5 && *limit == 100)
            .times(1)
            .returning(|_, _| Ok(vec![stored_user(false)]));
        repo.expect_count().times(1).returning(|| Ok(42));

        let service = UserManager::new(Arc::new(repo), silent_notifier(), UserServiceConfig::default());
        let page = service.list_users(5, 10_000).await.unwrap();

        assert_eq!(page.users.len(), 1);
        assert_eq!(page.total, 42);
        assert_eq!(page.limit, 100);
    }

    #[tokio::test]
    async fn test_locked_account_never_checks_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|_| Ok(Some(stored_user(true))));
        repo.expect_update().times(0);

        let service = UserManager::new(Arc::new(repo), silent_notifier(), UserServiceConfig::default());
        let result = service.login("a@b.com", "anything").await;

        assert!(matches!(result, Err(AppError::AccountLocked)));
    }

    #[tokio::test]
    async fn test_unlock_persists_even_if_notification_fails() {
        let user = stored_user(true);
        let id = user.id;

        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(user.clone())));
        repo.expect_update().times(1).returning(Ok);

        let service = UserManager::new(Arc::new(repo), failing_notifier(), UserServiceConfig::default());
        let unlocked = service.unlock_user(id).await.unwrap();

        assert!(!unlocked.is_locked);
        assert_eq!(unlocked.failed_login_attempts, 0);
    }

    #[tokio::test]
    async fn test_rejected_registration_touches_nothing() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().times(0);
        repo.expect_create().times(0);

        let service = UserManager::new(Arc::new(repo), silent_notifier(), UserServiceConfig::default());
        let input = RegisterUser {
            user: CreateUser {
                email: "bad".to_string(),
                role: Some("ADMIN".to_string()),
                ..Default::default()
            },
            password: "long-enough".to_string(),
        };

        let result = service.register(input).await;
        assert!(matches!(result, Err(AppError::Rejected(_))));
    }
}
