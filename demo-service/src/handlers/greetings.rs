//! `GET /api/greetings`: greet a caller by name.
//!
//! In `llm` mode the greeting comes from the text generation client and is
//! wrapped in a [`MessageOutput`]. In `simple` mode the reply is the plain
//! text `Hello, <name>!`. Both modes reject a missing or blank name with 400.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use service_core::error::AppError;
use std::time::Instant;

use crate::{
    config::GreetingMode,
    dtos::{GreetingParams, MessageOutput},
    services::{metrics, providers::GenerationError},
    AppState,
};

pub const MISSING_NAME_MESSAGE: &str = "No name provided, who are you?";

/// Prompt sent to the text generation client for `name`.
pub fn greeting_prompt(name: &str) -> String {
    format!(
        "You are a greeter machine. Please provide a peaceful greeting for a person whose name is {}. Only provide that greeting with no quotes",
        name
    )
}

/// `GET /api/greetings?name=<name>`
pub async fn greet(
    State(state): State<AppState>,
    Query(params): Query<GreetingParams>,
) -> Result<Response, AppError> {
    respond(&state, params.name).await
}

/// `GET /api/greetings/:name`
pub async fn greet_by_path(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, AppError> {
    respond(&state, Some(name)).await
}

async fn respond(state: &AppState, name: Option<String>) -> Result<Response, AppError> {
    let mode = state.config.greeting.mode;
    let mode_label = mode_label(mode);

    let Some(name) = name.filter(|n| !n.trim().is_empty()) else {
        tracing::debug!(mode = mode_label, "Greeting requested without a name");
        metrics::record_greeting(mode_label, "missing_name");
        return Ok(missing_name(mode));
    };

    match mode {
        GreetingMode::Simple => {
            metrics::record_greeting(mode_label, "ok");
            Ok((StatusCode::OK, format!("Hello, {}!", name)).into_response())
        }
        GreetingMode::Llm => {
            let greeting = generate_greeting(state, &name).await.map_err(|e| {
                metrics::record_greeting(mode_label, e.kind());
                into_app_error(e)
            })?;
            metrics::record_greeting(mode_label, "ok");
            Ok((StatusCode::OK, Json(MessageOutput::new(greeting))).into_response())
        }
    }
}

fn missing_name(mode: GreetingMode) -> Response {
    match mode {
        GreetingMode::Simple => (StatusCode::BAD_REQUEST, MISSING_NAME_MESSAGE).into_response(),
        GreetingMode::Llm => (
            StatusCode::BAD_REQUEST,
            Json(MessageOutput::new(MISSING_NAME_MESSAGE)),
        )
            .into_response(),
    }
}

async fn generate_greeting(state: &AppState, name: &str) -> Result<String, GenerationError> {
    let generator = &state.text_generator;
    let timeout = state.config.greeting.generation_timeout();
    let prompt = greeting_prompt(name);

    let started = Instant::now();
    let result = match tokio::time::timeout(timeout, generator.generate(&prompt)).await {
        Ok(result) => result,
        Err(_) => Err(GenerationError::Timeout),
    };
    metrics::record_generation_latency(generator.name(), started.elapsed().as_secs_f64());

    match &result {
        Ok(greeting) => tracing::info!(
            provider = generator.name(),
            reply_len = greeting.len(),
            "Greeting generated"
        ),
        Err(e) => tracing::error!(
            provider = generator.name(),
            error = %e,
            kind = e.kind(),
            timeout_secs = timeout.as_secs(),
            "Text generation failed"
        ),
    }

    result
}

fn into_app_error(err: GenerationError) -> AppError {
    match err {
        GenerationError::Timeout => {
            AppError::GatewayTimeout("text generation timed out".to_string())
        }
        _ => AppError::BadGateway("text generation failed".to_string()),
    }
}

fn mode_label(mode: GreetingMode) -> &'static str {
    match mode {
        GreetingMode::Llm => "llm",
        GreetingMode::Simple => "simple",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_names_the_person_and_forbids_quotes() {
        let prompt = greeting_prompt("Luca");
        assert!(prompt.contains("whose name is Luca."));
        assert!(prompt.contains("peaceful greeting"));
        assert!(prompt.ends_with("with no quotes"));
    }

    #[test]
    fn timeouts_map_to_504_and_everything_else_to_502() {
        assert_eq!(
            into_app_error(GenerationError::Timeout).status_code(),
            StatusCode::GATEWAY_TIMEOUT
        );
        for err in [
            GenerationError::Network("refused".into()),
            GenerationError::MalformedResponse("eof".into()),
            GenerationError::Api {
                status: 500,
                message: "boom".into(),
            },
        ] {
            assert_eq!(into_app_error(err).status_code(), StatusCode::BAD_GATEWAY);
        }
    }
}
