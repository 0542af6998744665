//! Bearer token issuance and verification.
//!
//! Tokens are HS256 JWTs carrying the account id, username and role. They are
//! stateless: expiry is the only way a token stops being valid.

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::TokenConfig;
use crate::error::AppError;
use crate::models::{Account, Role};

/// Signed claim set embedded in every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account id, as a decimal string.
    pub sub: String,
    pub username: String,
    pub role: Role,
    /// Issued at (Unix seconds).
    pub iat: i64,
    /// Expires at (Unix seconds).
    pub exp: i64,
    /// Unique token id.
    pub jti: String,
}

impl Claims {
    pub fn for_account(account: &Account, issued_at: DateTime<Utc>, ttl: TimeDelta) -> Self {
        Self {
            sub: account.id.to_string(),
            username: account.username.clone(),
            role: account.role,
            iat: issued_at.timestamp(),
            exp: (issued_at + ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// The account id this token was issued for.
    pub fn subject_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// Why a token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Signature is valid but the expiry has passed.
    #[error("token has expired")]
    Expired,
    /// Bad signature, unparseable structure or unusable claims.
    #[error("token is malformed or its signature is invalid")]
    Malformed,
}

/// A freshly signed token together with the claims it carries.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

/// Signs and verifies bearer tokens with the process-wide secret.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: TimeDelta,
}

impl TokenIssuer {
    pub fn new(config: &TokenConfig) -> Self {
        let secret = config.secret_bytes();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl: config.ttl(),
        }
    }

    /// Issue a token for `account`, valid from now for the configured TTL.
    pub fn issue(&self, account: &Account) -> Result<IssuedToken, AppError> {
        self.issue_at(account, Utc::now())
    }

    /// Issue a token as if the current time were `issued_at`.
    pub fn issue_at(
        &self,
        account: &Account,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, AppError> {
        let claims = Claims::for_account(account, issued_at, self.ttl);
        let token = self.sign(&claims)?;
        Ok(IssuedToken { token, claims })
    }

    /// Encode and sign an arbitrary claim set.
    pub fn sign(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {e}")))
    }

    /// Validate signature and expiry, returning the embedded claims.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Malformed,
            }
        })?;

        if data.claims.subject_id().is_none() {
            return Err(TokenError::Malformed);
        }

        Ok(data.claims)
    }
}
