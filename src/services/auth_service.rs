//! Authentication service

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use redis::aio::ConnectionManager;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{debug, info};

use crate::{
    config::{Config, JwtConfig},
    constants::{token_scopes, EMAIL_TOKEN_EXPIRY_DAYS},
    db::repositories::UserRepository,
    error::{AppError, AppResult},
    models::{User, UserProfile},
    services::UserService,
    utils::{hash_password, verify_password},
};

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Username for access tokens, email for email tokens
    pub sub: String,
    pub scope: String,
    pub exp: i64,
    pub iat: i64,
}

/// Outcome of an email confirmation or a resend request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailStatus {
    Confirmed,
    AlreadyConfirmed,
    VerificationSent,
    UnknownEmail,
}

impl EmailStatus {
    pub fn message(self) -> &'static str {
        match self {
            Self::Confirmed => "Email confirmed",
            Self::AlreadyConfirmed => "Your email is already confirmed",
            Self::VerificationSent => "Check your email for confirmation",
            Self::UnknownEmail => "No user with this email was found",
        }
    }
}

/// Authentication service
pub struct AuthService;

impl AuthService {
    /// Register a new user
    pub async fn register(
        pool: &PgPool,
        username: &str,
        email: &str,
        password: &str,
    ) -> AppResult<User> {
        // Email is checked before username
        if UserRepository::find_by_email(pool, email).await?.is_some() {
            return Err(AppError::Conflict(
                "User with this email already exists".to_string(),
            ));
        }

        if UserRepository::find_by_username(pool, username).await?.is_some() {
            return Err(AppError::Conflict(
                "User with this username already exists".to_string(),
            ));
        }

        let hashed_password = hash_password(password)?;
        let user = UserService::create_user(pool, username, email, &hashed_password).await?;

        info!(user_id = user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Login with username and password, returning an access token
    pub async fn login(
        pool: &PgPool,
        config: &Config,
        username: &str,
        password: &str,
    ) -> AppResult<String> {
        let user = UserRepository::find_by_username(pool, username)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(password, &user.hashed_password)? {
            return Err(AppError::InvalidCredentials);
        }

        if !user.confirmed {
            return Err(AppError::EmailNotConfirmed);
        }

        let token = Self::create_access_token(&user.username, &config.jwt, None)?;
        info!(user_id = user.id, "User logged in");
        Ok(token)
    }

    /// Issue an access token for `subject`, valid for `expires_in` seconds or the configured default
    pub fn create_access_token(
        subject: &str,
        jwt: &JwtConfig,
        expires_in: Option<i64>,
    ) -> AppResult<String> {
        let lifetime = Duration::seconds(expires_in.unwrap_or(jwt.expiration_seconds));
        Self::encode_token(subject, token_scopes::ACCESS, lifetime, jwt)
    }

    /// Issue an email verification token
    pub fn create_email_token(email: &str, jwt: &JwtConfig) -> AppResult<String> {
        Self::encode_token(
            email,
            token_scopes::EMAIL,
            Duration::days(EMAIL_TOKEN_EXPIRY_DAYS),
            jwt,
        )
    }

    /// Verify JWT token and extract claims, requiring the given scope
    pub fn verify_token(token: &str, jwt: &JwtConfig, scope: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(jwt.secret.as_bytes()),
            &Validation::new(jwt.algorithm),
        )?;

        if token_data.claims.scope != scope {
            return Err(AppError::InvalidToken);
        }

        Ok(token_data.claims)
    }

    /// Extract the email address from a verification token
    pub fn email_from_token(token: &str, jwt: &JwtConfig) -> AppResult<String> {
        Self::verify_token(token, jwt, token_scopes::EMAIL)
            .map(|claims| claims.sub)
            .map_err(|_| AppError::InvalidEmailToken)
    }

    /// Resolve the user behind an access token, going through the profile cache
    pub async fn current_user(
        pool: &PgPool,
        mut redis: ConnectionManager,
        config: &Config,
        token: &str,
    ) -> AppResult<UserProfile> {
        let claims = Self::verify_token(token, &config.jwt, token_scopes::ACCESS)?;
        let username = claims.sub;

        if let Some(profile) = UserService::cached_profile(&mut redis, &username).await {
            debug!(username = %username, "User profile cache hit");
            return Ok(profile);
        }

        debug!(username = %username, "User profile cache miss");
        let user = UserRepository::find_by_username(pool, &username)
            .await?
            .ok_or(AppError::InvalidToken)?;

        let profile = UserProfile::from(user);
        UserService::cache_profile(&mut redis, &profile, config.redis.user_cache_ttl_seconds).await;

        Ok(profile)
    }

    /// Reject anyone who is not an admin
    pub fn require_admin(user: &UserProfile) -> AppResult<()> {
        if user.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden("Insufficient access rights".to_string()))
        }
    }

    /// Confirm the email address carried by a verification token
    pub async fn confirm_email(
        pool: &PgPool,
        redis: ConnectionManager,
        config: &Config,
        token: &str,
    ) -> AppResult<EmailStatus> {
        let email = Self::email_from_token(token, &config.jwt)?;

        let user = UserRepository::find_by_email(pool, &email)
            .await?
            .ok_or_else(|| AppError::BadRequest("Verification error".to_string()))?;

        if user.confirmed {
            return Ok(EmailStatus::AlreadyConfirmed);
        }

        UserService::confirm_email(pool, redis, &user).await?;
        info!(user_id = user.id, "Email confirmed");
        Ok(EmailStatus::Confirmed)
    }

    /// Decide whether a new verification email should go out for `email`.
    ///
    /// Returns the user to notify alongside the status; the caller does the sending.
    pub async fn request_email(pool: &PgPool, email: &str) -> AppResult<(EmailStatus, Option<User>)> {
        match UserRepository::find_by_email(pool, email).await? {
            None => Ok((EmailStatus::UnknownEmail, None)),
            Some(user) if user.confirmed => Ok((EmailStatus::AlreadyConfirmed, None)),
            Some(user) => Ok((EmailStatus::VerificationSent, Some(user))),
        }
    }

    fn encode_token(subject: &str, scope: &str, lifetime: Duration, jwt: &JwtConfig) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            scope: scope.to_string(),
            exp: (now + lifetime).timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::new(jwt.algorithm),
            &claims,
            &EncodingKey::from_secret(jwt.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Token generation failed: {}", e)))
    }
}
