//! Persisted entities.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A stored user. The name is unique and never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct User {
    /// Assigned by the store's identity sequence.
    pub id: i64,
    pub name: String,
    pub created_utc: DateTime<Utc>,
}

/// A user that has not been saved yet, so it has no id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
}

impl NewUser {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}
