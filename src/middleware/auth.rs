//! Bearer-token authentication

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use tracing::debug;

use crate::{error::AppError, models::UserProfile, services::AuthService, state::AppState};

/// Authenticated user resolved from the `Authorization: Bearer` header
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserProfile);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        // Already resolved earlier in this request
        if let Some(user) = parts.extensions.get::<UserProfile>() {
            return Ok(CurrentUser(user.clone()));
        }

        let path = parts.uri.path().to_string();
        let token = bearer_token(&parts.headers).ok_or_else(|| {
            debug!(path = %path, "Auth failed: missing or malformed Authorization header");
            AppError::Unauthorized
        })?;

        let user = AuthService::current_user(state.db(), state.redis(), state.config(), token)
            .await
            .map_err(|e| {
                debug!(path = %path, error = %e, "Auth failed: token rejected");
                e
            })?;

        debug!(path = %path, user_id = user.id, username = %user.username, "User authenticated");
        parts.extensions.insert(user.clone());
        Ok(CurrentUser(user))
    }
}

/// Extract the token from `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}
