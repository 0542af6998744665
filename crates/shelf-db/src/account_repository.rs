use chrono::{DateTime, Utc};
use shelf_core::error::AppError;
use shelf_core::models::{Account, NewAccount, Role};
use shelf_core::{AccountStore, USERNAME_TAKEN};
use sqlx::{PgPool, Pool, Postgres};

/// Repository for account persistence in PostgreSQL.
#[derive(Clone)]
pub struct AccountRepository {
    pool: Pool<Postgres>,
}

impl AccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert an account. A clash on the `username` unique constraint becomes
    /// [`AppError::Conflict`].
    pub async fn insert(&self, account: &NewAccount) -> Result<Account, AppError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            INSERT INTO users (username, password_hash, role)
            VALUES ($1, $2, $3)
            RETURNING user_id, username, password_hash, role, created_at
            "#,
        )
        .bind(&account.username)
        .bind(&account.password_hash)
        .bind(account.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict(USERNAME_TAKEN.into())
            }
            other => AppError::DatabaseError(other.to_string()),
        })?;

        row.try_into()
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<Account>, AppError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT user_id, username, password_hash, role, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        row.map(TryInto::try_into).transpose()
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Account>, AppError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT user_id, username, password_hash, role, created_at
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        row.map(TryInto::try_into).transpose()
    }

    /// All accounts, newest first.
    pub async fn list_all(&self) -> Result<Vec<Account>, AppError> {
        let rows = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT user_id, username, password_hash, role, created_at
            FROM users
            ORDER BY created_at DESC, user_id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Check database connectivity.
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(e.to_string()))?;
        Ok(())
    }
}

// -- Internal row type for sqlx deserialization --

#[derive(sqlx::FromRow)]
struct AccountRow {
    user_id: i64,
    username: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = AppError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let role: Role = row.role.parse().map_err(|_| {
            AppError::DatabaseError(format!(
                "Unknown role '{}' stored for user {}",
                row.role, row.user_id
            ))
        })?;

        Ok(Account {
            id: row.user_id,
            username: row.username,
            password_hash: row.password_hash,
            role,
            created_at: row.created_at,
        })
    }
}

// -- Trait implementation --

impl AccountStore for AccountRepository {
    async fn create(&self, account: &NewAccount) -> Result<Account, AppError> {
        self.insert(account).await
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, AppError> {
        self.get_by_username(username).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, AppError> {
        self.get_by_id(id).await
    }

    async fn list(&self) -> Result<Vec<Account>, AppError> {
        self.list_all().await
    }

    async fn health_check(&self) -> Result<(), AppError> {
        AccountRepository::health_check(self).await
    }
}
