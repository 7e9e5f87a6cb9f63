//! Authentication handler implementations

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use validator::Validate;

use crate::{
    constants::TOKEN_TYPE,
    error::AppResult,
    handlers::extract::{AppForm, AppJson, AppPath},
    models::{User, UserProfile},
    services::{email_service::spawn_verification_email, AuthService},
    state::AppState,
    utils::base_url,
};

use super::{
    request::{LoginForm, RegisterRequest, RequestEmail},
    response::{MessageResponse, TokenResponse},
};

/// Register a new user and send a verification email
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(payload): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserProfile>)> {
    payload.validate()?;

    let user = AuthService::register(
        state.db(),
        &payload.username,
        &payload.email,
        &payload.password,
    )
    .await?;

    send_verification(&state, &headers, &user);

    Ok((StatusCode::CREATED, Json(UserProfile::from(user))))
}

/// Exchange username and password for an access token
pub async fn login(
    State(state): State<AppState>,
    AppForm(form): AppForm<LoginForm>,
) -> AppResult<Json<TokenResponse>> {
    form.validate()?;

    let access_token =
        AuthService::login(state.db(), state.config(), &form.username, &form.password).await?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: TOKEN_TYPE.to_string(),
    }))
}

/// Confirm an email address from the link in the verification email
pub async fn confirmed_email(
    State(state): State<AppState>,
    AppPath(token): AppPath<String>,
) -> AppResult<Json<MessageResponse>> {
    let status =
        AuthService::confirm_email(state.db(), state.redis(), state.config(), &token).await?;

    Ok(Json(MessageResponse::new(status.message())))
}

/// Send a fresh verification link
pub async fn request_email(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(payload): AppJson<RequestEmail>,
) -> AppResult<Json<MessageResponse>> {
    payload.validate()?;

    let (status, user) = AuthService::request_email(state.db(), &payload.email).await?;
    if let Some(user) = user {
        send_verification(&state, &headers, &user);
    }

    Ok(Json(MessageResponse::new(status.message())))
}

fn send_verification(state: &AppState, headers: &HeaderMap, user: &User) {
    let host = base_url(headers, state.config().server.public_base_url.as_deref());
    spawn_verification_email(
        state.email().clone(),
        state.config().jwt.clone(),
        user.email.clone(),
        user.username.clone(),
        host,
    );
}
