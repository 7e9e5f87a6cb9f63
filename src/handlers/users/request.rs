//! User request DTOs

use axum::extract::Multipart;

use crate::{
    constants::MAX_AVATAR_SIZE,
    error::{AppError, AppResult},
};

/// Avatar image pulled out of a multipart body
#[derive(Debug)]
pub struct AvatarUpload {
    pub data: Vec<u8>,
    pub file_name: String,
    pub content_type: Option<String>,
}

impl AvatarUpload {
    /// Read the `file` field, enforcing the avatar size limit
    pub async fn from_multipart(mut multipart: Multipart) -> AppResult<Self> {
        let mut upload = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read multipart: {}", e)))?
        {
            if field.name() != Some("file") {
                continue;
            }

            let file_name = field.file_name().unwrap_or("avatar").to_string();
            let content_type = field.content_type().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(format!("Failed to read file: {}", e)))?;

            check_size(data.len())?;

            upload = Some(Self {
                data: data.to_vec(),
                file_name,
                content_type,
            });
        }

        upload.ok_or_else(|| AppError::BadRequest("No file uploaded".to_string()))
    }
}

fn check_size(len: usize) -> AppResult<()> {
    if len == 0 {
        return Err(AppError::BadRequest("Uploaded file is empty".to_string()));
    }
    if len > MAX_AVATAR_SIZE {
        return Err(AppError::BadRequest(format!(
            "File size ({:.2}MB) exceeds the {:.0}MB limit",
            len as f64 / 1024.0 / 1024.0,
            MAX_AVATAR_SIZE as f64 / 1024.0 / 1024.0
        )));
    }
    Ok(())
}
