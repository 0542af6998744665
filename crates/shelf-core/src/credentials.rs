use std::sync::Arc;

use crate::error::AppError;
use crate::models::{Account, NewAccount};
use crate::password::{DUMMY_DIGEST, PasswordHasher};
use crate::token::{IssuedToken, TokenIssuer};
use crate::traits::AccountStore;
use crate::validation::{LoginAttempt, Registration};

/// Message returned when a username is already registered.
pub const USERNAME_TAKEN: &str = "Username already exists. Please choose a different username.";

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: IssuedToken,
    pub account: Account,
}

/// Registration, login and account lookup over an [`AccountStore`].
#[derive(Clone)]
pub struct CredentialService<S>
where
    S: AccountStore,
{
    store: S,
    hasher: PasswordHasher,
    tokens: Arc<TokenIssuer>,
}

impl<S> CredentialService<S>
where
    S: AccountStore,
{
    pub fn new(store: S, tokens: Arc<TokenIssuer>) -> Self {
        Self {
            store,
            hasher: PasswordHasher::new(),
            tokens,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn tokens(&self) -> &Arc<TokenIssuer> {
        &self.tokens
    }

    /// Create an account for a validated registration.
    ///
    /// Fails with [`AppError::Conflict`] if the username is taken.
    pub async fn register(&self, registration: Registration) -> Result<Account, AppError> {
        register_account(&self.store, &self.hasher, registration).await
    }

    /// Check credentials and issue a token.
    ///
    /// Unknown usernames and wrong passwords fail identically.
    pub async fn login(&self, attempt: LoginAttempt) -> Result<LoginOutcome, AppError> {
        let LoginAttempt { username, password } = attempt;

        let Some(account) = self.store.find_by_username(&username).await? else {
            self.check_password(password, DUMMY_DIGEST.to_owned()).await?;
            tracing::debug!(%username, reason = "unknown username", "Login failed");
            return Err(AppError::InvalidCredentials);
        };

        let valid = self
            .check_password(password, account.password_hash.clone())
            .await?;

        if !valid {
            tracing::debug!(%username, reason = "wrong password", "Login failed");
            return Err(AppError::InvalidCredentials);
        }

        let token = self.tokens.issue(&account)?;
        tracing::info!(id = account.id, %username, "Login succeeded");

        Ok(LoginOutcome { token, account })
    }

    async fn check_password(&self, password: String, digest: String) -> Result<bool, AppError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &digest))
            .await
            .map_err(|e| AppError::Internal(format!("Password check task failed: {e}")))
    }

    /// Load the account a verified token refers to.
    pub async fn profile(&self, account_id: i64) -> Result<Account, AppError> {
        self.store
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found.".into()))
    }

    /// All accounts, newest first.
    pub async fn list_accounts(&self) -> Result<Vec<Account>, AppError> {
        self.store.list().await
    }
}

/// Hash and store a validated registration without a token issuer.
///
/// Fails with [`AppError::Conflict`] if the username is taken.
pub async fn register_account<S: AccountStore>(
    store: &S,
    hasher: &PasswordHasher,
    registration: Registration,
) -> Result<Account, AppError> {
    let Registration {
        username,
        password,
        role,
    } = registration;

    if store.find_by_username(&username).await?.is_some() {
        tracing::info!(%username, "Registration rejected, username taken");
        return Err(AppError::Conflict(USERNAME_TAKEN.into()));
    }

    let hasher = hasher.clone();
    let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| AppError::Internal(format!("Password hashing task failed: {e}")))??;

    let account = store
        .create(&NewAccount {
            username,
            password_hash,
            role,
        })
        .await?;

    tracing::info!(id = account.id, username = %account.username, role = %account.role, "Account registered");
    Ok(account)
}
