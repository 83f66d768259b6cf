//! HTTP handlers for demo-service.

pub mod greetings;
pub mod users;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::{config::GreetingMode, services::get_metrics, AppState};

/// Health check endpoint for Docker/K8s liveness probes.
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "demo-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// Readiness check endpoint for K8s readiness probes.
///
/// Only the user store gates readiness. An unreachable model server makes
/// greetings fail with 502 but leaves the user endpoints usable.
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let store = match state.users.health_check().await {
        Ok(()) => "ok",
        Err(e) => {
            tracing::warn!(error = %e, "User store is not ready");
            "unavailable"
        }
    };

    let text_generation = match state.config.greeting.mode {
        GreetingMode::Simple => "disabled",
        GreetingMode::Llm => match state.text_generator.health_check().await {
            Ok(()) => "ok",
            Err(e) => {
                tracing::warn!(error = %e, "Text generation client is not reachable");
                "unavailable"
            }
        },
    };

    let (status, label) = if store == "ok" {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
    };

    (
        status,
        Json(json!({
            "status": label,
            "user_store": store,
            "text_generation": text_generation
        })),
    )
}

/// Prometheus metrics endpoint.
pub async fn metrics_endpoint() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        get_metrics(),
    )
}
