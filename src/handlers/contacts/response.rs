//! Contact response DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::models::Contact;

/// Contact as returned by the API
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub id: i32,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub phone: String,
    pub birthday: NaiveDate,
    pub extra_info: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Contact> for ContactResponse {
    fn from(c: Contact) -> Self {
        Self {
            id: c.id,
            name: c.name,
            surname: c.surname,
            email: c.email,
            phone: c.phone,
            birthday: c.birthday,
            extra_info: c.extra_info,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}
