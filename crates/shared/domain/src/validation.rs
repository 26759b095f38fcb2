//! User input validation.
//!
//! The grammars are exposed as standalone predicates. The `validate_*`
//! functions run them as an ordered pipeline: whole-object preconditions
//! first, then independent per-field checks whose violations are all
//! collected into one [`Rejection`].

use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidateEmail;

use crate::constants::{
    FIELD_EMAIL, FIELD_GITHUB_PROFILE_URL, FIELD_LINKEDIN_PROFILE_URL, FIELD_NICKNAME,
    FIELD_PASSWORD, FIELD_PROFILE_PICTURE_URL, FIELD_ROLE, MIN_NICKNAME_LENGTH,
    MIN_PASSWORD_LENGTH, VALID_ROLES,
};
use crate::error::{Rejection, ValidationError};
use crate::nickname::NicknameGenerator;
use crate::user::{CreateUser, RegisterUser, UpdateUser, UserChanges, UserRecord, UserRole};

static NICKNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w-]+$").expect("nickname pattern is valid"));

static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?:http|ftp)s?://",                       // scheme
        r"(?:\S+(?::\S*)?@)?",                       // user:pass
        r"(?:[A-Za-z0-9.-]+|\[[A-Fa-f0-9:.]+\])",    // domain or bracketed address
        r"(?::\d+)?",                                // port
        r"(?:/?|[/?]\S+)$",                          // path
    ))
    .expect("url pattern is valid")
});

// =============================================================================
// Predicates
// =============================================================================

/// Check an email address against the standard address grammar.
pub fn is_valid_email(email: &str) -> bool {
    email.to_string().validate_email()
}

/// Check a nickname: at least 3 characters, word characters and hyphens only.
pub fn is_valid_nickname(nickname: &str) -> bool {
    nickname.chars().count() >= MIN_NICKNAME_LENGTH && NICKNAME_RE.is_match(nickname)
}

/// Check a profile link against the URL grammar.
pub fn is_valid_url(url: &str) -> bool {
    URL_RE.is_match(url)
}

// =============================================================================
// Field checks
// =============================================================================

fn check_email(email: &str) -> Result<String, ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::invalid_format(FIELD_EMAIL, "email is required"));
    }
    if !is_valid_email(email) {
        return Err(ValidationError::invalid_format(
            FIELD_EMAIL,
            "value is not a valid email address",
        ));
    }
    Ok(email.to_string())
}

fn check_nickname(nickname: &str) -> Result<String, ValidationError> {
    if nickname.chars().count() < MIN_NICKNAME_LENGTH {
        return Err(ValidationError::invalid_format(
            FIELD_NICKNAME,
            format!("must be at least {} characters", MIN_NICKNAME_LENGTH),
        ));
    }
    if !is_valid_nickname(nickname) {
        return Err(ValidationError::invalid_format(
            FIELD_NICKNAME,
            "may only contain letters, digits, underscores and hyphens",
        ));
    }
    Ok(nickname.to_string())
}

fn check_url(field: &'static str, url: Option<&str>) -> Result<Option<String>, ValidationError> {
    match url {
        None => Ok(None),
        Some(url) if is_valid_url(url) => Ok(Some(url.to_string())),
        Some(_) => Err(ValidationError::invalid_format(field, "Invalid URL format")),
    }
}

fn check_role(role: Option<&str>) -> Result<UserRole, ValidationError> {
    match role {
        Some(role) => role.parse(),
        None => Err(ValidationError::InvalidEnum {
            field: FIELD_ROLE,
            allowed: VALID_ROLES,
        }),
    }
}

/// Check a plain-text password before hashing.
pub fn check_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::invalid_format(
            FIELD_PASSWORD,
            format!("must be at least {} characters", MIN_PASSWORD_LENGTH),
        ));
    }
    Ok(())
}

/// Turn the failed checks, if any, into a rejection.
fn reject_if_any(results: &[Option<&ValidationError>]) -> Result<(), Rejection> {
    let errors = results.iter().flatten().map(|err| (*err).clone()).collect();
    match Rejection::from_errors(errors) {
        Some(rejection) => Err(rejection),
        None => Ok(()),
    }
}

// =============================================================================
// Pipelines
// =============================================================================

/// Validate a creation payload into a normalized record.
///
/// A missing nickname is filled from `nicknames`, once per call.
pub fn validate_create(
    input: &CreateUser,
    nicknames: &dyn NicknameGenerator,
) -> Result<UserRecord, Rejection> {
    let email = check_email(&input.email);
    let nickname = match input.nickname.as_deref() {
        Some(nickname) => check_nickname(nickname),
        None => Ok(nicknames.generate()),
    };
    let profile_picture_url = check_url(
        FIELD_PROFILE_PICTURE_URL,
        input.profile_picture_url.as_deref(),
    );
    let linkedin_profile_url = check_url(
        FIELD_LINKEDIN_PROFILE_URL,
        input.linkedin_profile_url.as_deref(),
    );
    let github_profile_url = check_url(
        FIELD_GITHUB_PROFILE_URL,
        input.github_profile_url.as_deref(),
    );
    let role = check_role(input.role.as_deref());

    reject_if_any(&[
        email.as_ref().err(),
        nickname.as_ref().err(),
        profile_picture_url.as_ref().err(),
        linkedin_profile_url.as_ref().err(),
        github_profile_url.as_ref().err(),
        role.as_ref().err(),
    ])?;

    Ok(UserRecord {
        email: email?,
        nickname: nickname?,
        first_name: input.first_name.clone(),
        last_name: input.last_name.clone(),
        bio: input.bio.clone(),
        profile_picture_url: profile_picture_url?,
        linkedin_profile_url: linkedin_profile_url?,
        github_profile_url: github_profile_url?,
        is_professional: input.is_professional.unwrap_or(false),
        role: role?,
    })
}

/// Validate a registration payload: the record plus the password rule.
pub fn validate_registration(
    input: &RegisterUser,
    nicknames: &dyn NicknameGenerator,
) -> Result<UserRecord, Rejection> {
    let record = validate_create(&input.user, nicknames);
    let password = check_password(&input.password).map_err(Rejection::from);

    match (record, password) {
        (Ok(record), Ok(())) => Ok(record),
        (Err(rejection), Ok(())) | (Ok(_), Err(rejection)) => Err(rejection),
        (Err(rejection), Err(password)) => Err(rejection.merge(password)),
    }
}

fn has_text(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// True when the update payload carries at least one value.
///
/// Blank strings count as absent; a present boolean counts as a value.
pub fn has_any_value(input: &UpdateUser) -> bool {
    [
        &input.email,
        &input.nickname,
        &input.first_name,
        &input.last_name,
        &input.bio,
        &input.profile_picture_url,
        &input.linkedin_profile_url,
        &input.github_profile_url,
        &input.role,
    ]
    .into_iter()
    .any(has_text)
        || input.is_professional.is_some()
}

/// Validate a partial update.
///
/// Fails with `EmptyUpdate` before any field check when nothing is set.
pub fn validate_update(input: &UpdateUser) -> Result<UserChanges, Rejection> {
    if !has_any_value(input) {
        return Err(ValidationError::EmptyUpdate.into());
    }

    let email = input.email.as_deref().map(check_email).transpose();
    let nickname = input.nickname.as_deref().map(check_nickname).transpose();
    let profile_picture_url = check_url(
        FIELD_PROFILE_PICTURE_URL,
        input.profile_picture_url.as_deref(),
    );
    let linkedin_profile_url = check_url(
        FIELD_LINKEDIN_PROFILE_URL,
        input.linkedin_profile_url.as_deref(),
    );
    let github_profile_url = check_url(
        FIELD_GITHUB_PROFILE_URL,
        input.github_profile_url.as_deref(),
    );
    let role = input
        .role
        .as_deref()
        .map(|role| role.parse::<UserRole>())
        .transpose();

    reject_if_any(&[
        email.as_ref().err(),
        nickname.as_ref().err(),
        profile_picture_url.as_ref().err(),
        linkedin_profile_url.as_ref().err(),
        github_profile_url.as_ref().err(),
        role.as_ref().err(),
    ])?;

    Ok(UserChanges {
        email: email?,
        nickname: nickname?,
        first_name: input.first_name.clone(),
        last_name: input.last_name.clone(),
        bio: input.bio.clone(),
        profile_picture_url: profile_picture_url?,
        linkedin_profile_url: linkedin_profile_url?,
        github_profile_url: github_profile_url?,
        is_professional: input.is_professional,
        role: role?,
    })
}
