//! User handler implementations

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};

use crate::{
    error::AppResult,
    middleware::CurrentUser,
    models::UserProfile,
    services::UserService,
    state::AppState,
};

use super::request::AvatarUpload;

/// Get the authenticated user's profile
pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserProfile> {
    Json(user)
}

/// Replace the authenticated user's avatar
pub async fn update_avatar(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<UserProfile>> {
    let upload = AvatarUpload::from_multipart(multipart?).await?;

    let url = state
        .uploads()
        .upload_file(
            upload.data,
            &upload.file_name,
            upload.content_type.as_deref(),
            &user.username,
        )
        .await?;

    let user = UserService::update_avatar_url(state.db(), state.redis(), &user.email, &url).await?;

    Ok(Json(user.into()))
}
