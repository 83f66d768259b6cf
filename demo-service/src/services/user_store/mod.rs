//! User persistence.
//!
//! Handlers only see the [`UserStore`] trait. PostgreSQL backs production;
//! the in-memory store backs local runs and tests.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryUserStore;
pub use postgres::PgUserStore;

use crate::models::{NewUser, User};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("User name must not be blank")]
    InvalidName,

    #[error("User '{0}' already exists")]
    DuplicateName(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::InvalidName => "invalid_name",
            StoreError::DuplicateName(_) => "duplicate_name",
            StoreError::Database(_) => "database",
        }
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist a new user and return it with its assigned id.
    ///
    /// Fails on a blank name or a name that is already taken.
    async fn save(&self, user: NewUser) -> Result<User, StoreError>;

    /// Exact, case-sensitive lookup by name.
    async fn find_by_name(&self, name: &str) -> Result<Option<User>, StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}

pub(crate) fn ensure_not_blank(name: &str) -> Result<(), StoreError> {
    if name.trim().is_empty() {
        return Err(StoreError::InvalidName);
    }
    Ok(())
}
