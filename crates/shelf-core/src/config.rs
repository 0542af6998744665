use chrono::TimeDelta;
use secrecy::{ExposeSecret, SecretString};

use crate::error::AppError;

/// Environment variable holding the token-signing secret.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

/// Minimum secret length accepted for HS256 signing.
pub const MIN_SECRET_BYTES: usize = 32;

/// Lifetime of every issued token.
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Placeholder values that ship in sample `.env` files and must never sign real tokens.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "your_super_secret_jwt_key_change_this_in_production",
    "change-me-to-a-long-random-string-in-production",
];

/// Token-signing configuration, built once at startup and then read-only.
#[derive(Debug)]
pub struct TokenConfig {
    secret: SecretString,
    ttl: TimeDelta,
}

impl TokenConfig {
    /// Validate `secret` and build the configuration.
    pub fn new(secret: impl Into<String>) -> Result<Self, AppError> {
        let secret: String = secret.into();
        let trimmed = secret.trim();

        if trimmed.is_empty() {
            return Err(AppError::ConfigError(format!(
                "{JWT_SECRET_ENV} is empty. Refusing to start without a signing secret."
            )));
        }
        if trimmed.len() < MIN_SECRET_BYTES {
            return Err(AppError::ConfigError(format!(
                "{JWT_SECRET_ENV} must be at least {MIN_SECRET_BYTES} bytes long"
            )));
        }
        if PLACEHOLDER_SECRETS.contains(&trimmed) {
            return Err(AppError::ConfigError(format!(
                "{JWT_SECRET_ENV} is still set to the sample placeholder value"
            )));
        }

        Ok(Self {
            secret: SecretString::from(trimmed.to_string()),
            ttl: TimeDelta::hours(TOKEN_TTL_HOURS),
        })
    }

    /// Read configuration from environment variables.
    ///
    /// - `JWT_SECRET` (required, no fallback)
    pub fn from_env() -> Result<Self, AppError> {
        let secret = std::env::var(JWT_SECRET_ENV).map_err(|_| {
            AppError::ConfigError(format!(
                "{JWT_SECRET_ENV} not set. Refusing to start without a signing secret."
            ))
        })?;

        Self::new(secret)
    }

    pub fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    pub(crate) fn secret_bytes(&self) -> &[u8] {
        self.secret.expose_secret().as_bytes()
    }
}
