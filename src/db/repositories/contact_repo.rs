//! Contact repository
//!
//! Every query is scoped by `user_id`; a contact owned by someone else
//! behaves exactly like a missing one.

use sqlx::PgPool;

use crate::{
    error::AppResult,
    models::{Contact, ContactData},
};

/// Repository for contact database operations
pub struct ContactRepository;

impl ContactRepository {
    /// Create a contact owned by `user_id`
    pub async fn create(pool: &PgPool, user_id: i32, data: &ContactData) -> Result<Contact, sqlx::Error> {
        sqlx::query_as::<_, Contact>(
            r#"
            INSERT INTO contacts (name, surname, email, phone, birthday, extra_info, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&data.name)
        .bind(&data.surname)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(data.birthday)
        .bind(&data.extra_info)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Find a contact by ID
    pub async fn find_by_id(pool: &PgPool, id: i32, user_id: i32) -> AppResult<Option<Contact>> {
        let contact = sqlx::query_as::<_, Contact>(
            r#"SELECT * FROM contacts WHERE id = $1 AND user_id = $2"#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(contact)
    }

    /// List a user's contacts
    pub async fn list(pool: &PgPool, user_id: i32, skip: i64, limit: i64) -> AppResult<Vec<Contact>> {
        let contacts = sqlx::query_as::<_, Contact>(
            r#"
            SELECT * FROM contacts
            WHERE user_id = $1
            ORDER BY id
            OFFSET $2 LIMIT $3
            "#,
        )
        .bind(user_id)
        .bind(skip)
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(contacts)
    }

    /// Replace every writable field of a contact
    pub async fn update(
        pool: &PgPool,
        id: i32,
        user_id: i32,
        data: &ContactData,
    ) -> Result<Option<Contact>, sqlx::Error> {
        sqlx::query_as::<_, Contact>(
            r#"
            UPDATE contacts
            SET
                name = $3,
                surname = $4,
                email = $5,
                phone = $6,
                birthday = $7,
                extra_info = $8,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(user_id)
        .bind(&data.name)
        .bind(&data.surname)
        .bind(&data.email)
        .bind(&data.phone)
        .bind(data.birthday)
        .bind(&data.extra_info)
        .fetch_optional(pool)
        .await
    }

    /// Delete a contact and return it
    pub async fn remove(pool: &PgPool, id: i32, user_id: i32) -> AppResult<Option<Contact>> {
        let contact = sqlx::query_as::<_, Contact>(
            r#"DELETE FROM contacts WHERE id = $1 AND user_id = $2 RETURNING *"#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(contact)
    }

    /// Fetch the subset of `ids` owned by the user
    pub async fn find_by_ids(pool: &PgPool, ids: &[i32], user_id: i32) -> AppResult<Vec<Contact>> {
        let contacts = sqlx::query_as::<_, Contact>(
            r#"
            SELECT * FROM contacts
            WHERE id = ANY($1) AND user_id = $2
            ORDER BY id
            "#,
        )
        .bind(ids)
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(contacts)
    }
}
