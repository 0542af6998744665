use std::future::Future;

use crate::error::AppError;
use crate::models::{Account, NewAccount};

/// Persists and retrieves user accounts (the credential store).
///
/// Usernames are expected to arrive already normalized (trimmed, lowercased).
pub trait AccountStore: Send + Sync + Clone {
    /// Insert a new account and return it with its assigned id and timestamp.
    ///
    /// Must return [`AppError::Conflict`] when the username is already taken.
    fn create(
        &self,
        account: &NewAccount,
    ) -> impl Future<Output = Result<Account, AppError>> + Send;

    fn find_by_username(
        &self,
        username: &str,
    ) -> impl Future<Output = Result<Option<Account>, AppError>> + Send;

    fn find_by_id(&self, id: i64) -> impl Future<Output = Result<Option<Account>, AppError>> + Send;

    /// All accounts, newest first.
    fn list(&self) -> impl Future<Output = Result<Vec<Account>, AppError>> + Send;

    /// Check connectivity to the backing store.
    fn health_check(&self) -> impl Future<Output = Result<(), AppError>> + Send;
}
