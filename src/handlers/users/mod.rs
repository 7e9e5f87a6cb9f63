//! User profile handlers

mod handler;
pub mod request;

pub use handler::*;
pub use request::*;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, patch},
    Router,
};

use crate::{
    constants::MAX_AVATAR_SIZE, middleware::me_rate_limit_middleware, state::AppState,
};

/// User routes
pub fn routes(state: AppState) -> Router<AppState> {
    let me = Router::new()
        .route("/me", get(handler::me))
        .route_layer(middleware::from_fn_with_state(state, me_rate_limit_middleware));

    let avatar = Router::new()
        .route("/avatar", patch(handler::update_avatar))
        // Leave room for multipart framing around the file itself
        .layer(DefaultBodyLimit::max(MAX_AVATAR_SIZE + 64 * 1024));

    me.merge(avatar)
}
