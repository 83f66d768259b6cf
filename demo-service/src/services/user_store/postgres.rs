//! PostgreSQL-backed user store.

use super::{ensure_not_blank, StoreError, UserStore};
use crate::config::DatabaseConfig;
use crate::models::{NewUser, User};
use crate::services::metrics::DB_QUERY_DURATION;
use async_trait::async_trait;
use secrecy::ExposeSecret;
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};

/// Connection pool wrapper implementing [`UserStore`].
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Create a new connection pool.
    #[instrument(skip(config), fields(service = "demo-service"))]
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .connect(config.url.expose_secret())
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply the embedded migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    #[instrument(skip(self, user), fields(name = %user.name))]
    async fn save(&self, user: NewUser) -> Result<User, StoreError> {
        ensure_not_blank(&user.name)?;

        let timer = DB_QUERY_DURATION
            .with_label_values(&["save_user"])
            .start_timer();

        let saved = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO app_user (name)
            VALUES ($1)
            RETURNING id, name, created_utc
            "#,
        )
        .bind(&user.name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                StoreError::DuplicateName(user.name.clone())
            }
            sqlx::Error::Database(ref db_err) if db_err.is_check_violation() => {
                StoreError::InvalidName
            }
            other => StoreError::Database(other),
        });

        timer.observe_duration();

        let saved = saved?;
        info!(user_id = saved.id, "User saved");

        Ok(saved)
    }

    #[instrument(skip(self))]
    async fn find_by_name(&self, name: &str) -> Result<Option<User>, StoreError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["find_user_by_name"])
            .start_timer();

        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, created_utc
            FROM app_user
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await;

        timer.observe_duration();

        Ok(user?)
    }

    #[instrument(skip(self))]
    async fn health_check(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
