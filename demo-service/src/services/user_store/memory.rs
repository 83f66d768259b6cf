use super::{ensure_not_blank, StoreError, UserStore};
use crate::models::{NewUser, User};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-local store keyed by name.
#[derive(Default)]
pub struct InMemoryUserStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    next_id: i64,
    users: HashMap<String, User>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.users.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn save(&self, user: NewUser) -> Result<User, StoreError> {
        ensure_not_blank(&user.name)?;

        // Uniqueness is checked and the row inserted under one write lock.
        let mut inner = self.inner.write().await;
        if inner.users.contains_key(&user.name) {
            return Err(StoreError::DuplicateName(user.name));
        }

        inner.next_id += 1;
        let saved = User {
            id: inner.next_id,
            name: user.name,
            created_utc: Utc::now(),
        };
        inner.users.insert(saved.name.clone(), saved.clone());

        Ok(saved)
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<User>, StoreError> {
        Ok(self.inner.read().await.users.get(name).cloned())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
