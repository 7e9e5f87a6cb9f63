//! Outbound email
//!
//! Mail goes through an HTTP mail API (Postmark-compatible `/email` endpoint).
//! Verification emails are fire-and-forget: failures are logged and never
//! surface to the HTTP caller.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tracing::{error, info};

use crate::{
    config::{JwtConfig, MailConfig},
    constants::VERIFICATION_EMAIL_SUBJECT,
    error::{AppError, AppResult},
    services::AuthService,
};

/// HTTP mail API client
#[derive(Debug, Clone)]
pub struct EmailClient {
    http_client: Client,
    base_url: String,
    sender: String,
    sender_name: String,
    authorization_token: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct SendEmailRequest<'a> {
    from: String,
    to: &'a str,
    subject: &'a str,
    html_body: &'a str,
}

impl EmailClient {
    pub fn new(config: &MailConfig) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build mail client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            sender: config.from.clone(),
            sender_name: config.from_name.clone(),
            authorization_token: config.api_token.clone(),
        })
    }

    /// Send a single HTML email
    pub async fn send_email(&self, recipient: &str, subject: &str, html_body: &str) -> AppResult<()> {
        let body = SendEmailRequest {
            from: format!("{} <{}>", self.sender_name, self.sender),
            to: recipient,
            subject,
            html_body,
        };

        self.http_client
            .post(format!("{}/email", self.base_url))
            .header("X-Postmark-Server-Token", &self.authorization_token)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        Ok(())
    }

    /// Send the address verification email for a freshly registered user
    pub async fn send_verification_email(
        &self,
        jwt: &JwtConfig,
        email: &str,
        username: &str,
        host: &str,
    ) -> AppResult<()> {
        let token = AuthService::create_email_token(email, jwt)?;
        let html = render_verification_email(username, host, &token);
        self.send_email(email, VERIFICATION_EMAIL_SUBJECT, &html).await
    }
}

/// Send the verification email on a background task
pub fn spawn_verification_email(
    client: EmailClient,
    jwt: JwtConfig,
    email: String,
    username: String,
    host: String,
) {
    tokio::spawn(async move {
        match client
            .send_verification_email(&jwt, &email, &username, &host)
            .await
        {
            Ok(()) => info!(username = %username, "Verification email sent"),
            Err(e) => error!(username = %username, error = %e, "Failed to send verification email"),
        }
    });
}

/// Render the verification email body
pub fn render_verification_email(username: &str, host: &str, token: &str) -> String {
    let link = format!("{}api/auth/confirmed_email/{}", host, token);
    let username = escape_html(username);
    let link = escape_html(&link);

    format!(
        r#"<!DOCTYPE html>
<html>
  <body style="font-family: sans-serif;">
    <p>Hi {username},</p>
    <p>Thanks for signing up. Please confirm your email address by clicking the link below:</p>
    <p><a href="{link}">Confirm email</a></p>
    <p>If the button doesn't work, copy this address into your browser:<br>{link}</p>
    <p>The link is valid for 7 days.</p>
  </body>
</html>
"#
    )
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
