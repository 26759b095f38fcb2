//! User service integration tests.
//!
//! Runs the service over the in-memory repository with a cheap password
//! hasher and a transport that records outgoing mail.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio_test::assert_ok;
use uuid::Uuid;

use common::AppError;
use domain::{CreateUser, DomainResult, PasswordHasher, RegisterUser, UpdateUser, UserRole};
use notifier::{DeliveryError, MailTransport, Notifier};
use user_service_lib::{InMemoryUserStore, UserManager, UserService, UserServiceConfig};

// =============================================================================
// Test Doubles
// =============================================================================

/// Stores the password with a fixed prefix.
struct PrefixHasher;

impl PasswordHasher for PrefixHasher {
    fn hash(&self, plain_text: &str) -> DomainResult<String> {
        Ok(format!("hashed:{}", plain_text))
    }

    fn verify(&self, plain_text: &str, digest: &str) -> bool {
        digest == format!("hashed:{}", plain_text)
    }
}

#[derive(Debug, Clone)]
struct SentMail {
    subject: String,
    body: String,
    to: String,
}

#[derive(Default)]
struct Outbox {
    sent: Mutex<Vec<SentMail>>,
    failing: Mutex<bool>,
}

impl Outbox {
    fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }

    fn subjects(&self) -> Vec<String> {
        self.sent().into_iter().map(|m| m.subject).collect()
    }

    fn set_failing(&self, failing: bool) {
        *self.failing.lock().unwrap() = failing;
    }
}

#[async_trait]
impl MailTransport for Outbox {
    async fn deliver(&self, subject: &str, body: &str, to: &str) -> Result<(), DeliveryError> {
        if *self.failing.lock().unwrap() {
            return Err(DeliveryError::Transport("connection refused".into()));
        }
        self.sent.lock().unwrap().push(SentMail {
            subject: subject.to_string(),
            body: body.to_string(),
            to: to.to_string(),
        });
        Ok(())
    }

    fn name(&self) -> &'static str {
        "outbox"
    }
}

fn setup() -> (UserManager, Arc<Outbox>) {
    let outbox = Arc::new(Outbox::default());
    let notifier = Notifier::new(outbox.clone()).unwrap();
    let config = UserServiceConfig {
        server_base_url: "http://x".to_string(),
        max_login_attempts: 3,
        list_limit: 2,
    };
    let service = UserManager::new(Arc::new(InMemoryUserStore::new()), notifier, config)
        .with_password_hasher(Arc::new(PrefixHasher))
        .with_nickname_generator(Arc::new(|| format!("gen-{}", Uuid::new_v4().simple())));
    (service, outbox)
}

fn registration(email: &str, nickname: Option<&str>) -> RegisterUser {
    RegisterUser {
        user: CreateUser {
            email: email.to_string(),
            nickname: nickname.map(str::to_string),
            first_name: Some("Ann".to_string()),
            ..Default::default()
        },
        password: "correct-horse".to_string(),
    }
}

/// Register and verify an account, returning its id.
async fn registered_and_verified(service: &UserManager, email: &str) -> Uuid {
    let user = service.register(registration(email, None)).await.unwrap();
    let token = user.verification_token.clone().unwrap();
    assert_ok!(service.verify_email(user.id, &token).await);
    user.id
}

// =============================================================================
// Registration
// =============================================================================

#[tokio::test]
async fn test_register_sends_verification_link() {
    let (service, outbox) = setup();

    let user = service
        .register(registration("ann@example.com", Some("ann")))
        .await
        .unwrap();

    assert_eq!(user.role, UserRole::Anonymous);
    assert!(!user.email_verified);
    assert_eq!(user.password_hash, "hashed:correct-horse");

    let sent = outbox.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subject, "Verify Your Account");
    assert_eq!(sent[0].to, "ann@example.com");
    let token = user.verification_token.unwrap();
    assert!(sent[0]
        .body
        .contains(&format!("http://x/verify-email/{}/{}", user.id, token)));
}

#[tokio::test]
async fn test_register_ignores_requested_role() {
    let (service, _) = setup();
    let mut input = registration("evil@example.com", Some("evil"));
    input.user.role = Some("ADMIN".to_string());

    let user = service.register(input).await.unwrap();

    assert_eq!(user.role, UserRole::Anonymous);
    assert_eq!(service.get_user(user.id).await.unwrap().role, UserRole::Anonymous);
}

#[tokio::test]
async fn test_register_without_role_succeeds() {
    let (service, _) = setup();
    let input = RegisterUser {
        user: CreateUser {
            email: "plain@example.com".to_string(),
            ..Default::default()
        },
        password: "correct-horse".to_string(),
    };

    let user = service.register(input).await.unwrap();
    assert_eq!(user.role, UserRole::Anonymous);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registrations_store_email_once() {
    let (service, _) = setup();
    let service = Arc::new(service);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move { service.register(registration("dup@example.com", None)).await })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(err) => assert!(matches!(err, AppError::Conflict(_)), "unexpected error: {:?}", err),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(service.list_users(0, 10).await.unwrap().total, 1);
}

#[tokio::test]
async fn test_register_generates_nickname() {
    let (service, _) = setup();
    let user = service.register(registration("a@b.com", None)).await.unwrap();
    assert!(user.nickname.starts_with("gen-"));
}

#[tokio::test]
async fn test_register_rejects_duplicates() {
    let (service, _) = setup();
    assert_ok!(service.register(registration("ann@example.com", Some("ann"))).await);

    let same_email = service
        .register(registration("ANN@example.com", Some("other")))
        .await;
    assert!(matches!(same_email, Err(AppError::Conflict(_))));

    let same_nickname = service
        .register(registration("new@example.com", Some("ann")))
        .await;
    assert!(matches!(same_nickname, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_register_collects_validation_failures() {
    let (service, outbox) = setup();
    let mut input = registration("not-an-email", Some("x!"));
    input.password = "short".to_string();

    let err = service.register(input).await.unwrap_err();
    match err {
        AppError::Rejected(rejection) => {
            assert!(rejection.has_invalid_format("email"));
            assert!(rejection.has_invalid_format("nickname"));
            assert!(rejection.has_invalid_format("password"));
        }
        other => panic!("expected rejection, got {:?}", other),
    }
    assert!(outbox.sent().is_empty());
}

#[tokio::test]
async fn test_register_survives_delivery_failure() {
    let (service, outbox) = setup();
    outbox.set_failing(true);

    let user = service.register(registration("a@b.com", None)).await.unwrap();

    assert_ok!(service.get_user(user.id).await);
    assert!(outbox.sent().is_empty());
}

// =============================================================================
// Verification & Login
// =============================================================================

#[tokio::test]
async fn test_verify_email_promotes_anonymous() {
    let (service, _) = setup();
    let user = service.register(registration("a@b.com", None)).await.unwrap();
    let token = user.verification_token.clone().unwrap();

    let bad = service.verify_email(user.id, "wrong").await;
    assert!(matches!(bad, Err(AppError::BadRequest(_))));

    let verified = service.verify_email(user.id, &token).await.unwrap();
    assert!(verified.email_verified);
    assert_eq!(verified.role, UserRole::Authenticated);
    assert!(verified.verification_token.is_none());
}

#[tokio::test]
async fn test_login_requires_verified_email() {
    let (service, _) = setup();
    assert_ok!(service.register(registration("a@b.com", None)).await);

    let result = service.login("a@b.com", "correct-horse").await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn test_login_success_resets_counter() {
    let (service, _) = setup();
    let id = registered_and_verified(&service, "a@b.com").await;

    assert!(matches!(
        service.login("a@b.com", "wrong").await,
        Err(AppError::InvalidCredentials)
    ));
    assert_eq!(service.get_user(id).await.unwrap().failed_login_attempts, 1);

    let user = service.login("a@b.com", "correct-horse").await.unwrap();
    assert_eq!(user.failed_login_attempts, 0);
    assert!(user.last_login_at.is_some());
}

#[tokio::test]
async fn test_unknown_email_is_invalid_credentials() {
    let (service, _) = setup();
    let result = service.login("nobody@example.com", "whatever").await;
    assert!(matches!(result, Err(AppError::InvalidCredentials)));
}

#[tokio::test]
async fn test_lockout_and_unlock_notify() {
    let (service, outbox) = setup();
    let id = registered_and_verified(&service, "a@b.com").await;

    for _ in 0..3 {
        assert!(service.login("a@b.com", "wrong").await.is_err());
    }
    assert!(service.get_user(id).await.unwrap().is_locked);

    let locked = service.login("a@b.com", "correct-horse").await;
    assert!(matches!(locked, Err(AppError::AccountLocked)));

    let user = service.unlock_user(id).await.unwrap();
    assert!(!user.is_locked);
    assert_ok!(service.login("a@b.com", "correct-horse").await);

    assert_eq!(
        outbox.subjects(),
        vec![
            "Verify Your Account",
            "Account Locked Notification",
            "Account Unlocked Notification",
        ]
    );
}

// =============================================================================
// Role & Status
// =============================================================================

#[tokio::test]
async fn test_role_upgrade_notifies() {
    let (service, outbox) = setup();
    let user = service.register(registration("a@b.com", None)).await.unwrap();

    let user = service.change_role(user.id, "manager").await.unwrap();
    assert_eq!(user.role, UserRole::Manager);

    let sent = outbox.sent();
    let last = sent.last().unwrap();
    assert_eq!(last.subject, "Role Upgrade Notification");
    assert!(last.body.contains("MANAGER"));

    // Downgrades are silent.
    assert_ok!(service.change_role(user.id, "AUTHENTICATED").await);
    assert_eq!(outbox.sent().len(), sent.len());
}

#[tokio::test]
async fn test_change_role_rejects_unknown_role() {
    let (service, _) = setup();
    let user = service.register(registration("a@b.com", None)).await.unwrap();

    let err = service.change_role(user.id, "SUPERUSER").await.unwrap_err();
    assert!(matches!(err, AppError::Rejected(r) if r.has_invalid_enum("role")));
}

#[tokio::test]
async fn test_professional_status_notifies_on_grant_only() {
    let (service, outbox) = setup();
    let user = service.register(registration("a@b.com", None)).await.unwrap();

    let user = service.set_professional_status(user.id, true).await.unwrap();
    assert!(user.is_professional);
    assert!(user.professional_status_updated_at.is_some());

    assert_ok!(service.set_professional_status(user.id, true).await);
    assert_ok!(service.set_professional_status(user.id, false).await);

    let grants = outbox
        .subjects()
        .into_iter()
        .filter(|s| s == "Professional Status Upgrade Notification")
        .count();
    assert_eq!(grants, 1);
}

// =============================================================================
// Update, List, Delete
// =============================================================================

#[tokio::test]
async fn test_empty_update_is_rejected() {
    let (service, _) = setup();
    let user = service.register(registration("a@b.com", None)).await.unwrap();

    let input = UpdateUser {
        first_name: Some("   ".to_string()),
        ..Default::default()
    };
    let err = service.update_user(user.id, input).await.unwrap_err();
    assert!(matches!(err, AppError::Rejected(r) if r.is_empty_update()));
}

#[tokio::test]
async fn test_update_applies_fields() {
    let (service, _) = setup();
    let user = service.register(registration("a@b.com", None)).await.unwrap();

    let input = UpdateUser {
        bio: Some("Rustacean".to_string()),
        github_profile_url: Some("https://github.com/ann".to_string()),
        ..Default::default()
    };
    let updated = service.update_user(user.id, input).await.unwrap();
    assert_eq!(updated.bio.as_deref(), Some("Rustacean"));
    assert_eq!(updated.github_profile_url.as_deref(), Some("https://github.com/ann"));
    assert_eq!(updated.email, "a@b.com");
}

#[tokio::test]
async fn test_update_notifies_role_upgrade_and_professional_grant() {
    let (service, outbox) = setup();
    let user = service.register(registration("a@b.com", None)).await.unwrap();

    let input = UpdateUser {
        role: Some("admin".to_string()),
        is_professional: Some(true),
        ..Default::default()
    };
    let updated = service.update_user(user.id, input).await.unwrap();
    assert_eq!(updated.role, UserRole::Admin);
    assert!(updated.is_professional);

    assert_eq!(
        outbox.subjects(),
        vec![
            "Verify Your Account",
            "Role Upgrade Notification",
            "Professional Status Upgrade Notification",
        ]
    );
    assert!(outbox.sent()[1].body.contains("ADMIN"));
}

#[tokio::test]
async fn test_update_email_requires_new_verification() {
    let (service, outbox) = setup();
    let id = registered_and_verified(&service, "old@example.com").await;

    let input = UpdateUser {
        email: Some("new@example.com".to_string()),
        ..Default::default()
    };
    let updated = service.update_user(id, input).await.unwrap();

    assert_eq!(updated.email, "new@example.com");
    assert!(!updated.email_verified);
    let token = updated.verification_token.clone().unwrap();

    let last = outbox.sent().pop().unwrap();
    assert_eq!(last.subject, "Verify Your Account");
    assert_eq!(last.to, "new@example.com");
    assert!(last.body.contains(&format!("http://x/verify-email/{}/{}", id, token)));

    assert!(matches!(
        service.login("new@example.com", "correct-horse").await,
        Err(AppError::Forbidden(_))
    ));
    assert_ok!(service.verify_email(id, &token).await);
    assert_ok!(service.login("new@example.com", "correct-horse").await);
}

#[tokio::test]
async fn test_update_without_upgrades_sends_nothing() {
    let (service, outbox) = setup();
    let user = service.register(registration("a@b.com", None)).await.unwrap();

    let input = UpdateUser {
        bio: Some("hello".to_string()),
        email: Some("A@B.com".to_string()),
        ..Default::default()
    };
    assert_ok!(service.update_user(user.id, input).await);
    assert_eq!(outbox.sent().len(), 1);
}

#[tokio::test]
async fn test_update_nickname_conflict() {
    let (service, _) = setup();
    assert_ok!(service.register(registration("a@b.com", Some("taken"))).await);
    let other = service.register(registration("c@d.com", None)).await.unwrap();

    let input = UpdateUser {
        nickname: Some("taken".to_string()),
        ..Default::default()
    };
    let result = service.update_user(other.id, input).await;
    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_list_is_capped_and_delete_removes() {
    let (service, _) = setup();
    let mut ids = Vec::new();
    for i in 0..3 {
        let user = service
            .register(registration(&format!("u{}@b.com", i), None))
            .await
            .unwrap();
        ids.push(user.id);
    }

    let page = service.list_users(0, 50).await.unwrap();
    assert_eq!(page.users.len(), 2);
    assert_eq!(page.limit, 2);
    assert_eq!(page.total, 3);

    assert_ok!(service.delete_user(ids[0]).await);
    assert!(matches!(service.get_user(ids[0]).await, Err(AppError::NotFound)));
    assert!(matches!(service.delete_user(ids[0]).await, Err(AppError::NotFound)));
}
