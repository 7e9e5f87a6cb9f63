//! Service health handlers

use axum::{extract::State, routing::get, Json, Router};
use tracing::error;

use crate::{
    db,
    error::{AppError, AppResult},
    handlers::auth::MessageResponse,
    state::AppState,
};

/// Check that the database answers queries
async fn healthchecker(State(state): State<AppState>) -> AppResult<Json<MessageResponse>> {
    db::ping(state.db()).await.map_err(|e| {
        error!(error = %e, "Health check failed");
        AppError::Misconfigured("Database is not configured correctly".to_string())
    })?;

    Ok(Json(MessageResponse::new("Welcome to the contacts API!")))
}

/// Health routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/healthchecker", get(healthchecker))
}
