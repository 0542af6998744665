//! Test utilities: in-memory implementations of the core traits.
//!
//! Handwritten stores for dependency injection in unit and integration tests.
//! State lives behind `Arc<Mutex<_>>` so clones share it, like a pool handle.

use std::sync::{Arc, Mutex};

use chrono::Utc;

use crate::credentials::USERNAME_TAKEN;
use crate::error::AppError;
use crate::models::{Account, NewAccount};
use crate::traits::AccountStore;

// ---------------------------------------------------------------------------
// InMemoryAccountStore
// ---------------------------------------------------------------------------

/// Account store backed by a `Vec`, enforcing username uniqueness.
#[derive(Clone, Default)]
pub struct InMemoryAccountStore {
    accounts: Arc<Mutex<Vec<Account>>>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts.
    pub fn len(&self) -> usize {
        self.accounts.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove an account, simulating deletion behind a still-valid token.
    pub fn remove(&self, id: i64) {
        self.accounts.lock().unwrap().retain(|a| a.id != id);
    }
}

impl AccountStore for InMemoryAccountStore {
    async fn create(&self, account: &NewAccount) -> Result<Account, AppError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.iter().any(|a| a.username == account.username) {
            return Err(AppError::Conflict(USERNAME_TAKEN.into()));
        }

        let id = accounts.iter().map(|a| a.id).max().unwrap_or(0) + 1;
        let created = Account {
            id,
            username: account.username.clone(),
            password_hash: account.password_hash.clone(),
            role: account.role,
            created_at: Utc::now(),
        };
        accounts.push(created.clone());
        Ok(created)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, AppError> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.iter().find(|a| a.username == username).cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, AppError> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.iter().find(|a| a.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Account>, AppError> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.iter().rev().cloned().collect())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FailingAccountStore
// ---------------------------------------------------------------------------

/// Store whose every call fails with a database error.
#[derive(Clone)]
pub struct FailingAccountStore {
    message: String,
}

impl FailingAccountStore {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }

    fn error(&self) -> AppError {
        AppError::DatabaseError(self.message.clone())
    }
}

impl AccountStore for FailingAccountStore {
    async fn create(&self, _account: &NewAccount) -> Result<Account, AppError> {
        Err(self.error())
    }

    async fn find_by_username(&self, _username: &str) -> Result<Option<Account>, AppError> {
        Err(self.error())
    }

    async fn find_by_id(&self, _id: i64) -> Result<Option<Account>, AppError> {
        Err(self.error())
    }

    async fn list(&self) -> Result<Vec<Account>, AppError> {
        Err(self.error())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        Err(self.error())
    }
}
