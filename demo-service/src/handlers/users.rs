//! `POST /api/users` and `GET /api/users/:name`.
//!
//! Store failures never reach the client as details: create answers 500 and
//! read answers 404, both with an empty body, and the cause goes to the log.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use service_core::error::AppError;
use validator::Validate;

use crate::{dtos::UserDto, services::metrics, AppState};

/// Create a user. 201 on success, 400 on a blank name, 500 if the store
/// refuses the write (including a taken name).
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<UserDto>,
) -> Result<StatusCode, AppError> {
    if let Err(e) = payload.validate() {
        metrics::record_user_operation("create", "invalid");
        return Err(e.into());
    }

    let status = match state.users.save(payload.into_new_user()).await {
        Ok(user) => {
            tracing::info!(user_id = user.id, name = %user.name, "User created");
            metrics::record_user_operation("create", "created");
            StatusCode::CREATED
        }
        Err(e) => {
            tracing::error!(error = %e, kind = e.kind(), "Could not create user");
            metrics::record_user_operation("create", e.kind());
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    Ok(status)
}

/// Read a user by exact name. Absent and store failure both answer 404.
pub async fn read_user(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<UserDto>, StatusCode> {
    match state.users.find_by_name(&name).await {
        Ok(Some(user)) => {
            metrics::record_user_operation("read", "found");
            Ok(Json(UserDto::from(user)))
        }
        Ok(None) => {
            tracing::debug!(name = %name, "User not found");
            metrics::record_user_operation("read", "not_found");
            Err(StatusCode::NOT_FOUND)
        }
        Err(e) => {
            tracing::error!(error = %e, kind = e.kind(), name = %name, "Could not read user");
            metrics::record_user_operation("read", e.kind());
            Err(StatusCode::NOT_FOUND)
        }
    }
}
