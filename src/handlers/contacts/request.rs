//! Contact request DTOs

use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::{
    constants::{
        DEFAULT_CONTACTS_LIMIT, MAX_CONTACTS_LIMIT, MAX_CONTACT_EMAIL_LENGTH,
        MAX_CONTACT_EXTRA_INFO_LENGTH, MAX_CONTACT_NAME_LENGTH, MAX_CONTACT_PHONE_LENGTH,
        MAX_CONTACT_SURNAME_LENGTH,
    },
    error::{AppError, AppResult},
    models::ContactData,
    utils::validation::{sanitize_string, PHONE_REGEX},
};

/// Body of create and update requests
#[derive(Debug, Deserialize, Validate)]
pub struct ContactRequest {
    #[validate(length(min = 1, max = MAX_CONTACT_NAME_LENGTH))]
    pub name: String,

    #[validate(length(min = 1, max = MAX_CONTACT_SURNAME_LENGTH))]
    pub surname: String,

    #[validate(email, length(max = MAX_CONTACT_EMAIL_LENGTH))]
    pub email: String,

    #[validate(length(min = 1, max = MAX_CONTACT_PHONE_LENGTH), regex(path = *PHONE_REGEX))]
    pub phone: String,

    pub birthday: NaiveDate,

    #[validate(length(max = MAX_CONTACT_EXTRA_INFO_LENGTH))]
    pub extra_info: Option<String>,
}

impl ContactRequest {
    /// Validate and normalize into repository input
    pub fn into_data(self) -> AppResult<ContactData> {
        self.validate()?;

        let name = sanitize_string(&self.name);
        let surname = sanitize_string(&self.surname);
        if name.is_empty() || surname.is_empty() {
            return Err(AppError::Validation(
                "name and surname must not be blank".to_string(),
            ));
        }

        Ok(ContactData {
            name,
            surname,
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            birthday: self.birthday,
            extra_info: self
                .extra_info
                .map(|s| sanitize_string(&s))
                .filter(|s| !s.is_empty()),
        })
    }
}

/// List contacts query parameters
#[derive(Debug, Deserialize)]
pub struct ListContactsQuery {
    pub skip: Option<i64>,
    pub limit: Option<i64>,
}

impl ListContactsQuery {
    /// Resolve defaults and bounds into (skip, limit)
    pub fn pagination(&self) -> AppResult<(i64, i64)> {
        let skip = self.skip.unwrap_or(0);
        let limit = self.limit.unwrap_or(DEFAULT_CONTACTS_LIMIT);

        if skip < 0 {
            return Err(AppError::Validation("skip must be non-negative".to_string()));
        }
        if limit < 1 {
            return Err(AppError::Validation("limit must be positive".to_string()));
        }

        Ok((skip, limit.min(MAX_CONTACTS_LIMIT)))
    }
}
