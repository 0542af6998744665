//! Core types for Shelf: accounts, roles, credential handling, tokens and access control.

pub mod access;
pub mod config;
pub mod credentials;
pub mod error;
pub mod models;
pub mod password;
pub mod token;
pub mod traits;
pub mod validation;

#[cfg(any(test, feature = "testutil"))]
pub mod testutil;

pub use access::{AccessDenied, AccessGate, Authenticate, Authorize, bearer_token};
pub use config::TokenConfig;
pub use credentials::{CredentialService, LoginOutcome, USERNAME_TAKEN, register_account};
pub use error::AppError;
pub use models::{Account, AllowedRoles, NewAccount, Role};
pub use password::PasswordHasher;
pub use token::{Claims, IssuedToken, TokenError, TokenIssuer};
pub use traits::AccountStore;
pub use validation::{LoginAttempt, Registration};
