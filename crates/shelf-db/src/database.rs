use shelf_core::AppError;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::account_repository::AccountRepository;
use crate::config::DatabaseConfig;

/// Shared PostgreSQL pool behind the account store.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Open a pool sized by `config.max_connections`.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to connect: {e}")))?;

        tracing::info!(max_connections = config.max_connections, "Database pool ready");
        Ok(Self { pool })
    }

    /// Wrap a pool opened elsewhere, e.g. by a test container.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Bring the `users` table up to the embedded schema.
    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Migration failed: {e}")))?;

        tracing::debug!("Schema up to date");
        Ok(())
    }

    /// Account store sharing this pool.
    pub fn account_repo(&self) -> AccountRepository {
        AccountRepository::new(self.pool.clone())
    }
}
