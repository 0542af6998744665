//! Request input validation and normalization.
//!
//! Runs at the HTTP/CLI boundary, before any credential logic sees the input.

use std::fmt;

use crate::error::AppError;
use crate::models::Role;

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 50;
pub const PASSWORD_MIN_LEN: usize = 6;
pub const PASSWORD_MAX_LEN: usize = 128;

/// Canonical form used for storage and lookup: trimmed and lowercased.
pub fn normalize_username(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// A registration request that passed validation.
#[derive(Clone)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub role: Role,
}

impl Registration {
    pub fn parse(
        username: Option<&str>,
        password: Option<&str>,
        role: Option<&str>,
    ) -> Result<Self, AppError> {
        let (Some(username), Some(password), Some(role)) = (
            non_empty(username),
            non_empty(password),
            non_empty(role),
        ) else {
            return Err(AppError::Validation(
                "Missing required fields. Please provide username, password, and role.".into(),
            ));
        };

        let username = normalize_username(username);
        let len = username.chars().count();
        if len < USERNAME_MIN_LEN {
            return Err(AppError::Validation(format!(
                "Username must be at least {USERNAME_MIN_LEN} characters long."
            )));
        }
        if len > USERNAME_MAX_LEN {
            return Err(AppError::Validation(format!(
                "Username must not exceed {USERNAME_MAX_LEN} characters."
            )));
        }

        let len = password.chars().count();
        if len < PASSWORD_MIN_LEN {
            return Err(AppError::Validation(format!(
                "Password must be at least {PASSWORD_MIN_LEN} characters long."
            )));
        }
        if len > PASSWORD_MAX_LEN {
            return Err(AppError::Validation(format!(
                "Password must not exceed {PASSWORD_MAX_LEN} characters."
            )));
        }
        if !password.chars().any(|c| c.is_ascii_alphabetic())
            || !password.chars().any(|c| c.is_ascii_digit())
        {
            return Err(AppError::Validation(
                "Password must contain at least one letter and one number.".into(),
            ));
        }

        let role: Role = role.parse().map_err(AppError::Validation)?;

        Ok(Self {
            username,
            password: password.to_string(),
            role,
        })
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

/// A login request that passed validation.
#[derive(Clone)]
pub struct LoginAttempt {
    pub username: String,
    pub password: String,
}

impl LoginAttempt {
    pub fn parse(username: Option<&str>, password: Option<&str>) -> Result<Self, AppError> {
        let (Some(username), Some(password)) = (username, password) else {
            return Err(AppError::Validation(
                "Missing required fields. Please provide username and password.".into(),
            ));
        };

        let username = normalize_username(username);
        if username.is_empty() || password.is_empty() {
            return Err(AppError::Validation(
                "Username and password cannot be empty.".into(),
            ));
        }

        Ok(Self {
            username,
            password: password.to_string(),
        })
    }
}

impl fmt::Debug for LoginAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginAttempt")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
