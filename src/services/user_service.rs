//! User service

use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use sqlx::PgPool;
use tracing::{debug, warn};

use crate::{
    constants::user_cache_key,
    db::repositories::UserRepository,
    error::{AppError, AppResult},
    models::{User, UserProfile},
    utils::sha256_hex,
};

/// User service for business logic
pub struct UserService;

impl UserService {
    /// Create a user with a Gravatar avatar derived from the email
    pub async fn create_user(
        pool: &PgPool,
        username: &str,
        email: &str,
        hashed_password: &str,
    ) -> AppResult<User> {
        let avatar = Self::gravatar_url(email);
        UserRepository::create(pool, username, email, hashed_password, Some(&avatar)).await
    }

    /// Get user by ID
    pub async fn get_user_by_id(pool: &PgPool, id: i32) -> AppResult<Option<User>> {
        UserRepository::find_by_id(pool, id).await
    }

    /// Get user by username
    pub async fn get_user_by_username(pool: &PgPool, username: &str) -> AppResult<Option<User>> {
        UserRepository::find_by_username(pool, username).await
    }

    /// Get user by email
    pub async fn get_user_by_email(pool: &PgPool, email: &str) -> AppResult<Option<User>> {
        UserRepository::find_by_email(pool, email).await
    }

    /// Gravatar image URL for an email address
    pub fn gravatar_url(email: &str) -> String {
        let digest = sha256_hex(&email.trim().to_lowercase());
        format!("https://www.gravatar.com/avatar/{}", digest)
    }

    /// Mark the user's email as confirmed and drop the stale cached profile
    pub async fn confirm_email(pool: &PgPool, mut redis: ConnectionManager, user: &User) -> AppResult<()> {
        if !UserRepository::confirm_email(pool, &user.email).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        Self::invalidate_profile(&mut redis, &user.username).await;
        Ok(())
    }

    /// Point the user's avatar at `url`
    pub async fn update_avatar_url(
        pool: &PgPool,
        mut redis: ConnectionManager,
        email: &str,
        url: &str,
    ) -> AppResult<User> {
        let user = UserRepository::update_avatar_url(pool, email, url)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Self::invalidate_profile(&mut redis, &user.username).await;
        Ok(user)
    }

    /// Read a cached profile. Cache failures are treated as misses.
    pub async fn cached_profile(redis: &mut ConnectionManager, username: &str) -> Option<UserProfile> {
        let key = user_cache_key(username);
        let raw: Option<String> = match redis.get(&key).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "User cache read failed");
                return None;
            }
        };

        match serde_json::from_str(&raw?) {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!(key = %key, error = %e, "Discarding malformed cached profile");
                None
            }
        }
    }

    /// Store a profile in the cache
    pub async fn cache_profile(redis: &mut ConnectionManager, profile: &UserProfile, ttl_seconds: u64) {
        let key = user_cache_key(&profile.username);
        let json = match serde_json::to_string(profile) {
            Ok(json) => json,
            Err(e) => {
                warn!(error = %e, "Failed to serialize profile for cache");
                return;
            }
        };

        if let Err(e) = redis.set_ex::<_, _, ()>(&key, json, ttl_seconds).await {
            warn!(error = %e, "User cache write failed");
        }
    }

    /// Remove a profile from the cache
    pub async fn invalidate_profile(redis: &mut ConnectionManager, username: &str) {
        let key = user_cache_key(username);
        match redis.del::<_, ()>(&key).await {
            Ok(()) => debug!(key = %key, "User profile cache invalidated"),
            Err(e) => warn!(key = %key, error = %e, "User cache invalidation failed"),
        }
    }
}
