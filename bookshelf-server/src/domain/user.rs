use std::ops::RangeInclusive;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use super::error::DomainError;

const AVATAR_BASE_URL: &str = "https://api.dicebear.com/7.x/avataaars/svg";
const USERNAME_CHARS: RangeInclusive<usize> = 3..=64;
const PASSWORD_CHARS: RangeInclusive<usize> = 6..=128;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RegisterRequest {
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) password: String,
}

impl RegisterRequest {
    /// Trims and lowercases where the stored form differs from the typed one.
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let Self {
            username,
            email,
            password,
        } = self;

        check_char_len("password", &password, PASSWORD_CHARS, "must be 6..128 chars")?;
        Ok(Self {
            username: normalize_register_username(&username)?,
            email: normalize_email(&email)?,
            password,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct LoginRequest {
    pub(crate) email: String,
    pub(crate) password: String,
}

impl LoginRequest {
    // login checks presence only; the length policy applies at registration
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let Self { email, password } = self;

        if password.is_empty() {
            return Err(DomainError::Validation {
                field: "password",
                message: "must not be empty",
            });
        }
        Ok(Self {
            email: normalize_email(&email)?,
            password,
        })
    }
}

/// Public view of an account. The password hash never lives here.
#[derive(Debug, Clone)]
pub(crate) struct User {
    pub(crate) id: i64,
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) profile_image: String,
    pub(crate) created_at: DateTime<Utc>,
}

impl User {
    pub(crate) fn new(
        id: i64,
        username: impl Into<String>,
        email: impl Into<String>,
        profile_image: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if id <= 0 {
            return Err(DomainError::Validation {
                field: "id",
                message: "must be > 0",
            });
        }
        let username = normalize_register_username(&username.into())?;
        let email = normalize_email(&email.into())?;

        Ok(Self {
            id,
            username,
            email,
            profile_image: profile_image.into(),
            created_at,
        })
    }
}

pub(crate) fn default_avatar_url(username: &str) -> String {
    let seed: String = username
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();
    format!("{AVATAR_BASE_URL}?seed={seed}")
}

fn normalize_register_username(username: &str) -> Result<String, DomainError> {
    let username = username.trim();
    check_char_len("username", username, USERNAME_CHARS, "must be 3..64 chars")?;
    Ok(username.to_owned())
}

// limits count characters, not bytes
fn check_char_len(
    field: &'static str,
    value: &str,
    limits: RangeInclusive<usize>,
    message: &'static str,
) -> Result<(), DomainError> {
    if limits.contains(&value.chars().count()) {
        Ok(())
    } else {
        Err(DomainError::Validation { field, message })
    }
}

fn normalize_email(email: &str) -> Result<String, DomainError> {
    let email = email.trim().to_lowercase();
    if !email.validate_email() {
        return Err(DomainError::Validation {
            field: "email",
            message: "must be a valid email",
        });
    }
    Ok(email)
}
