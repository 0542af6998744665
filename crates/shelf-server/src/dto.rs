use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shelf_core::models::{Account, Role};

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Missing fields are reported by validation, not by JSON decoding.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    /// 3 to 50 characters, stored lowercased
    pub username: Option<String>,
    /// 6 to 128 characters with at least one letter and one digit
    pub password: Option<String>,
    /// `member` or `librarian`
    pub role: Option<String>,
}

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// Public view of an account, as returned by registration and listings.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AccountResponse {
    pub user_id: i64,
    pub username: String,
    #[schema(value_type = String, example = "member")]
    pub role: Role,
    pub created_date: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            user_id: account.id,
            username: account.username,
            role: account.role,
            created_date: account.created_at,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserSummary {
    pub user_id: i64,
    pub username: String,
    #[schema(value_type = String, example = "member")]
    pub role: Role,
}

impl From<&Account> for UserSummary {
    fn from(account: &Account) -> Self {
        Self {
            user_id: account.id,
            username: account.username.clone(),
            role: account.role,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserSummary,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ProfileResponse {
    pub user: AccountResponse,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct VerifyTokenResponse {
    pub valid: bool,
    pub user: UserSummary,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AccountListResponse {
    pub count: usize,
    pub users: Vec<AccountResponse>,
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}
