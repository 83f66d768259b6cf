//! Common test utilities for demo-service integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use demo_service::config::{
    DemoConfig, GreetingConfig, GreetingMode, OllamaConfig, StoreBackend, UserStoreConfig,
};
use demo_service::models::{NewUser, User};
use demo_service::services::providers::{MockTextGenerator, TextGenerator};
use demo_service::services::{InMemoryUserStore, StoreError, UserStore};
use demo_service::{AppState, Application};
use service_core::config::Config as CommonConfig;
use std::sync::{Arc, Once};
use std::time::Duration;

static INIT: Once = Once::new();

/// Initialize tracing for tests (only once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("info,demo_service=debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub fn test_config(mode: GreetingMode) -> DemoConfig {
    DemoConfig {
        common: CommonConfig {
            port: 0,
            log_level: "debug".to_string(),
            otlp_endpoint: None,
        },
        greeting: GreetingConfig {
            mode,
            generation_timeout_secs: 1,
        },
        ollama: OllamaConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            model: "llama3.2".to_string(),
        },
        user_store: UserStoreConfig {
            backend: StoreBackend::Memory,
            database: None,
        },
    }
}

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub client: reqwest::Client,
}

impl TestApp {
    /// LLM mode, in-memory store, generator replying with a fixed greeting.
    pub async fn spawn() -> Self {
        Self::spawn_with(
            GreetingMode::Llm,
            Arc::new(InMemoryUserStore::new()),
            Arc::new(MockTextGenerator::replying("Peace be with you, friend")),
        )
        .await
    }

    pub async fn spawn_with(
        mode: GreetingMode,
        users: Arc<dyn UserStore>,
        text_generator: Arc<dyn TextGenerator>,
    ) -> Self {
        init_tracing();

        let state = AppState {
            config: test_config(mode),
            users,
            text_generator,
        };

        let app = Application::build_with_state(state)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to be ready by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            client,
        }
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn create_user(&self, body: serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}/api/users", self.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }
}

/// A store whose every call fails, standing in for a lost database.
pub struct FailingUserStore;

#[async_trait]
impl UserStore for FailingUserStore {
    async fn save(&self, _user: NewUser) -> Result<User, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn find_by_name(&self, _name: &str) -> Result<Option<User>, StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Err(StoreError::Database(sqlx::Error::PoolTimedOut))
    }
}
