//! Avatar uploads to Cloudinary

use std::time::Duration;

use chrono::Utc;
use reqwest::{multipart, Client};
use serde::Deserialize;
use tracing::info;

use crate::{
    config::CloudinaryConfig,
    constants::{AVATAR_FOLDER, AVATAR_SIZE_PX, CLOUDINARY_DELIVERY_BASE},
    error::{AppError, AppResult},
    utils::sha256_hex,
};

/// Signed Cloudinary upload client
#[derive(Debug, Clone)]
pub struct UploadFileService {
    http_client: Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
    api_base: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    version: u64,
}

#[derive(Debug, Deserialize)]
struct CloudinaryErrorBody {
    error: CloudinaryErrorMessage,
}

#[derive(Debug, Deserialize)]
struct CloudinaryErrorMessage {
    message: String,
}

impl UploadFileService {
    pub fn new(config: &CloudinaryConfig) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build upload client: {}", e)))?;

        Ok(Self {
            http_client,
            cloud_name: config.cloud_name.clone(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    /// Public id under which a user's avatar is stored
    pub fn public_id(username: &str) -> String {
        format!("{}/{}", AVATAR_FOLDER, username)
    }

    /// Upload an image as the user's avatar and return its resized delivery URL.
    ///
    /// Re-uploads overwrite the previous avatar; the version in the URL busts CDN caches.
    pub async fn upload_file(
        &self,
        data: Vec<u8>,
        file_name: &str,
        content_type: Option<&str>,
        username: &str,
    ) -> AppResult<String> {
        let public_id = Self::public_id(username);
        let timestamp = Utc::now().timestamp().to_string();

        let signed_params = [
            ("overwrite", "true"),
            ("public_id", public_id.as_str()),
            ("timestamp", timestamp.as_str()),
        ];
        let signature = sign_params(&signed_params, &self.api_secret);

        let mut part = multipart::Part::bytes(data).file_name(file_name.to_string());
        if let Some(mime) = content_type {
            part = part
                .mime_str(mime)
                .map_err(|_| AppError::BadRequest("Invalid file content type".to_string()))?;
        }

        let mut form = multipart::Form::new()
            .part("file", part)
            .text("api_key", self.api_key.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");
        for (key, value) in signed_params {
            form = form.text(key, value.to_string());
        }

        let url = format!("{}/v1_1/{}/image/upload", self.api_base, self.cloud_name);
        let response = self.http_client.post(url).multipart(form).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .json::<CloudinaryErrorBody>()
                .await
                .map(|b| b.error.message)
                .unwrap_or_else(|_| format!("status {}", status));
            return Err(AppError::Upstream(format!("Avatar upload failed: {}", message)));
        }

        let uploaded: UploadResponse = response.json().await?;
        info!(public_id = %public_id, version = uploaded.version, "Avatar uploaded");

        Ok(self.avatar_url(&public_id, uploaded.version))
    }

    /// Delivery URL of a square, fill-cropped avatar
    pub fn avatar_url(&self, public_id: &str, version: u64) -> String {
        format!(
            "{}/{}/image/upload/c_fill,h_{size},w_{size}/v{}/{}",
            CLOUDINARY_DELIVERY_BASE,
            self.cloud_name,
            version,
            public_id,
            size = AVATAR_SIZE_PX
        )
    }
}

/// Cloudinary request signature: sorted `key=value` pairs joined by `&`, followed by the secret
pub fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted: Vec<_> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    sha256_hex(&format!("{}{}", to_sign, api_secret))
}
