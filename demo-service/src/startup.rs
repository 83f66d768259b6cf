//! Application startup and lifecycle management.
//!
//! [`Application::build`] wires the collaborators named in the configuration
//! into an [`AppState`]; tests that need other collaborators build the state
//! themselves and go through [`Application::build_with_state`].

use crate::config::{DemoConfig, StoreBackend};
use crate::handlers::{self, greetings, users};
use crate::services::providers::{OllamaTextGenerator, TextGenerator};
use crate::services::{InMemoryUserStore, PgUserStore, UserStore};
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{make_request_span, metrics_middleware, request_id_middleware};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: DemoConfig,
    pub users: Arc<dyn UserStore>,
    pub text_generator: Arc<dyn TextGenerator>,
}

/// Build the HTTP router over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .route("/api/greetings", get(greetings::greet))
        // An empty path segment reads as an absent name.
        .route("/api/greetings/", get(greetings::greet))
        .route("/api/greetings/:name", get(greetings::greet_by_path))
        .route("/api/users", post(users::create_user))
        .route("/api/users/:name", get(users::read_user))
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span::<axum::body::Body>))
        // Outermost, so the span and the handler both see the request id.
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: DemoConfig) -> Result<Self, AppError> {
        let users: Arc<dyn UserStore> = match config.user_store.backend {
            StoreBackend::Postgres => {
                let database = config.user_store.database.as_ref().ok_or_else(|| {
                    AppError::ConfigError(anyhow::anyhow!(
                        "USER_STORE=postgres needs database settings"
                    ))
                })?;

                let store = PgUserStore::connect(database).await.map_err(|e| {
                    tracing::error!("Failed to connect to PostgreSQL: {}", e);
                    e
                })?;
                store.run_migrations().await.map_err(|e| {
                    tracing::error!("Failed to run database migrations: {}", e);
                    e
                })?;
                Arc::new(store)
            }
            StoreBackend::Memory => {
                tracing::warn!("Using the in-memory user store; users are lost on restart");
                Arc::new(InMemoryUserStore::new())
            }
        };

        let text_generator: Arc<dyn TextGenerator> = Arc::new(
            OllamaTextGenerator::new(config.ollama.clone(), config.greeting.generation_timeout())
                .map_err(|e| AppError::ConfigError(anyhow::Error::new(e)))?,
        );

        tracing::info!(
            mode = ?config.greeting.mode,
            base_url = %config.ollama.base_url,
            model = %config.ollama.model,
            timeout_secs = config.greeting.generation_timeout_secs,
            "Initialized Ollama text generator"
        );

        Self::build_with_state(AppState {
            config,
            users,
            text_generator,
        })
        .await
    }

    /// Bind the listener for an already assembled state.
    pub async fn build_with_state(state: AppState) -> Result<Self, AppError> {
        // Port 0 = random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], state.config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Demo service: HTTP on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    /// Get the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Serve until Ctrl+C or SIGTERM, letting in-flight requests finish.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
