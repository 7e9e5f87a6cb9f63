//! Contact service

use sqlx::PgPool;
use tracing::info;

use crate::{
    constants::CONTACT_UNIQUE_CONSTRAINT,
    db::repositories::ContactRepository,
    error::{AppError, AppResult},
    models::{Contact, ContactData},
};

/// Contact service for business logic
pub struct ContactService;

impl ContactService {
    /// Create a contact for the user
    pub async fn create_contact(pool: &PgPool, user_id: i32, data: &ContactData) -> AppResult<Contact> {
        let contact = ContactRepository::create(pool, user_id, data)
            .await
            .map_err(integrity_error)?;

        info!(user_id, contact_id = contact.id, "Contact created");
        Ok(contact)
    }

    /// Get a single contact
    pub async fn get_contact(pool: &PgPool, id: i32, user_id: i32) -> AppResult<Option<Contact>> {
        ContactRepository::find_by_id(pool, id, user_id).await
    }

    /// List contacts with offset pagination
    pub async fn get_contacts(pool: &PgPool, user_id: i32, skip: i64, limit: i64) -> AppResult<Vec<Contact>> {
        ContactRepository::list(pool, user_id, skip, limit).await
    }

    /// Replace a contact's fields
    pub async fn update_contact(
        pool: &PgPool,
        id: i32,
        user_id: i32,
        data: &ContactData,
    ) -> AppResult<Option<Contact>> {
        ContactRepository::update(pool, id, user_id, data)
            .await
            .map_err(integrity_error)
    }

    /// Delete a contact, returning what was removed
    pub async fn remove_contact(pool: &PgPool, id: i32, user_id: i32) -> AppResult<Option<Contact>> {
        let contact = ContactRepository::remove(pool, id, user_id).await?;
        if let Some(contact) = &contact {
            info!(user_id, contact_id = contact.id, "Contact removed");
        }
        Ok(contact)
    }

    /// Fetch several contacts at once; ids the user doesn't own are skipped
    pub async fn get_contacts_by_ids(pool: &PgPool, ids: &[i32], user_id: i32) -> AppResult<Vec<Contact>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        ContactRepository::find_by_ids(pool, ids, user_id).await
    }
}

/// Map constraint violations on the contacts table to client errors
fn integrity_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.constraint() == Some(CONTACT_UNIQUE_CONSTRAINT) {
            return AppError::Conflict("Contact with this name already exists".to_string());
        }
        if db_err.is_unique_violation()
            || db_err.is_foreign_key_violation()
            || db_err.is_check_violation()
        {
            return AppError::BadRequest("Data integrity error".to_string());
        }
    }
    err.into()
}
