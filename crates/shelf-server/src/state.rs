use std::sync::Arc;

use shelf_core::{AccountStore, CredentialService, TokenIssuer};

/// Shared application state, available to all route handlers via `State<Arc<AppState<S>>>`.
pub struct AppState<S>
where
    S: AccountStore,
{
    pub credentials: CredentialService<S>,
    pub tokens: Arc<TokenIssuer>,
}

impl<S> AppState<S>
where
    S: AccountStore,
{
    pub fn new(store: S, tokens: Arc<TokenIssuer>) -> Self {
        Self {
            credentials: CredentialService::new(store, tokens.clone()),
            tokens,
        }
    }
}
