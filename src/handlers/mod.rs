//! HTTP Request Handlers
//!
//! This module contains all HTTP request handlers organized by domain.

pub mod auth;
pub mod contacts;
pub mod extract;
pub mod users;
pub mod utils;

use axum::Router;

use crate::state::AppState;

/// Create all API routes
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(utils::routes())
        .nest("/auth", auth::routes())
        .nest("/contacts", contacts::routes())
        .nest("/users", users::routes(state))
}
