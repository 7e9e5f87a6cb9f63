//! Contact handler implementations

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    error::{AppError, AppResult},
    handlers::extract::{AppJson, AppPath, AppQuery},
    middleware::CurrentUser,
    services::ContactService,
    state::AppState,
};

use super::{
    request::{ContactRequest, ListContactsQuery},
    response::ContactResponse,
};

fn not_found() -> AppError {
    AppError::NotFound("Contact not found".to_string())
}

/// List the caller's contacts
pub async fn list_contacts(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    AppQuery(query): AppQuery<ListContactsQuery>,
) -> AppResult<Json<Vec<ContactResponse>>> {
    let (skip, limit) = query.pagination()?;

    let contacts = ContactService::get_contacts(state.db(), user.id, skip, limit).await?;

    Ok(Json(contacts.into_iter().map(ContactResponse::from).collect()))
}

/// Get one contact
pub async fn get_contact(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    AppPath(id): AppPath<i32>,
) -> AppResult<Json<ContactResponse>> {
    let contact = ContactService::get_contact(state.db(), id, user.id)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(contact.into()))
}

/// Create a contact
pub async fn create_contact(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    AppJson(payload): AppJson<ContactRequest>,
) -> AppResult<(StatusCode, Json<ContactResponse>)> {
    let data = payload.into_data()?;

    let contact = ContactService::create_contact(state.db(), user.id, &data).await?;

    Ok((StatusCode::CREATED, Json(contact.into())))
}

/// Replace a contact
pub async fn update_contact(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<ContactRequest>,
) -> AppResult<Json<ContactResponse>> {
    let data = payload.into_data()?;

    let contact = ContactService::update_contact(state.db(), id, user.id, &data)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(contact.into()))
}

/// Delete a contact, echoing it back
pub async fn remove_contact(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    AppPath(id): AppPath<i32>,
) -> AppResult<Json<ContactResponse>> {
    let contact = ContactService::remove_contact(state.db(), id, user.id)
        .await?
        .ok_or_else(not_found)?;

    Ok(Json(contact.into()))
}
