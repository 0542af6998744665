//! Two-stage access control: authenticate the bearer token, then authorize its role.
//!
//! Each stage either yields the (possibly augmented) context or short-circuits with
//! an [`AccessDenied`]. [`AccessGate`] composes them; the second stage never runs
//! when the first rejected.

use std::sync::Arc;

use crate::models::{AllowedRoles, Role};
use crate::token::{Claims, TokenError, TokenIssuer};

/// Rejection produced by the access gate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessDenied {
    #[error("Access denied. No token provided.")]
    MissingToken,

    #[error("Token has expired. Please login again.")]
    TokenExpired,

    #[error("Invalid token.")]
    InvalidToken,

    #[error("User not authenticated.")]
    NotAuthenticated,

    #[error("Access denied. Required role: {required}. Your role: {actual}")]
    RoleMismatch { required: AllowedRoles, actual: Role },
}

impl AccessDenied {
    /// Stable machine-readable code for responses.
    pub fn code(&self) -> &'static str {
        match self {
            AccessDenied::MissingToken => "missing_token",
            AccessDenied::TokenExpired => "token_expired",
            AccessDenied::InvalidToken => "invalid_token",
            AccessDenied::NotAuthenticated => "unauthenticated",
            AccessDenied::RoleMismatch { .. } => "forbidden",
        }
    }

    /// True for rejections where the caller is authenticated (or presented a
    /// token) but is not allowed through.
    pub fn is_forbidden(&self) -> bool {
        matches!(
            self,
            AccessDenied::InvalidToken | AccessDenied::RoleMismatch { .. }
        )
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(authorization: Option<&str>) -> Option<&str> {
    authorization
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Stage 1: verify the bearer token and resolve its claims.
#[derive(Clone)]
pub struct Authenticate {
    tokens: Arc<TokenIssuer>,
}

impl Authenticate {
    pub fn new(tokens: Arc<TokenIssuer>) -> Self {
        Self { tokens }
    }

    pub fn check(&self, authorization: Option<&str>) -> Result<Claims, AccessDenied> {
        let token = bearer_token(authorization).ok_or(AccessDenied::MissingToken)?;

        self.tokens.verify(token).map_err(|e| match e {
            TokenError::Expired => AccessDenied::TokenExpired,
            TokenError::Malformed => AccessDenied::InvalidToken,
        })
    }
}

/// Stage 2: compare the authenticated role against the route's allowed set.
#[derive(Debug, Clone)]
pub struct Authorize {
    allowed: AllowedRoles,
}

impl Authorize {
    pub fn new(allowed: AllowedRoles) -> Self {
        Self { allowed }
    }

    pub fn check(&self, claims: Option<&Claims>) -> Result<(), AccessDenied> {
        let claims = claims.ok_or(AccessDenied::NotAuthenticated)?;

        if self.allowed.permits(claims.role) {
            Ok(())
        } else {
            Err(AccessDenied::RoleMismatch {
                required: self.allowed.clone(),
                actual: claims.role,
            })
        }
    }
}

/// Per-route gate: [`Authenticate`] followed by [`Authorize`].
#[derive(Clone)]
pub struct AccessGate {
    authenticate: Authenticate,
    authorize: Authorize,
}

impl AccessGate {
    pub fn new(tokens: Arc<TokenIssuer>, allowed: AllowedRoles) -> Self {
        Self {
            authenticate: Authenticate::new(tokens),
            authorize: Authorize::new(allowed),
        }
    }

    /// Gate that only requires a valid token, whatever the role.
    pub fn authenticated(tokens: Arc<TokenIssuer>) -> Self {
        Self::new(tokens, AllowedRoles::any())
    }

    pub fn check(&self, authorization: Option<&str>) -> Result<Claims, AccessDenied> {
        let claims = self.authenticate.check(authorization)?;
        self.authorize.check(Some(&claims))?;
        Ok(claims)
    }
}
