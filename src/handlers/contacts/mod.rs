//! Contact management handlers

mod handler;
pub mod request;
pub mod response;

pub use handler::*;
pub use request::*;
pub use response::*;

use axum::{routing::get, Router};

use crate::state::AppState;

/// Contact routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list_contacts).post(handler::create_contact))
        .route(
            "/{id}",
            get(handler::get_contact)
                .put(handler::update_contact)
                .delete(handler::remove_contact),
        )
}
