//! Application configuration management
//!
//! This module handles loading and validating configuration from environment variables.
//! All configuration is loaded at startup and validated before the application runs.

use std::env;
use std::str::FromStr;
use std::sync::LazyLock;

use jsonwebtoken::Algorithm;

use crate::constants::{
    rate_limits, DEFAULT_CLOUDINARY_API_BASE, DEFAULT_CORS_ORIGIN,
    DEFAULT_DATABASE_MAX_CONNECTIONS, DEFAULT_JWT_ALGORITHM, DEFAULT_JWT_EXPIRATION_SECONDS,
    DEFAULT_MAIL_API_URL, DEFAULT_MAIL_FROM_NAME, DEFAULT_MAIL_TIMEOUT_SECONDS,
    DEFAULT_REDIS_URL, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEFAULT_USER_CACHE_TTL_SECONDS,
};

/// Global application configuration (lazily initialized)
pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Config::from_env().expect("Failed to load configuration from environment")
});

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    pub mail: MailConfig,
    pub cloudinary: CloudinaryConfig,
    pub rate_limit: RateLimitConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
    /// `pretty` or `json`
    pub log_format: String,
    pub cors_origins: Vec<String>,
    /// Overrides the request-derived host in verification links
    pub public_base_url: Option<String>,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Redis configuration
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
    pub user_cache_ttl_seconds: u64,
}

/// JWT authentication configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub algorithm: Algorithm,
    pub expiration_seconds: i64,
}

/// Outbound mail API configuration
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub api_url: String,
    pub api_token: String,
    pub from: String,
    pub from_name: String,
    pub timeout_seconds: u64,
}

/// Cloudinary credentials
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub api_base: String,
}

/// Rate limit for the profile endpoint
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub me_max_requests: i64,
    pub me_window_seconds: i64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            redis: RedisConfig::from_env()?,
            jwt: JwtConfig::from_env()?,
            mail: MailConfig::from_env()?,
            cloudinary: CloudinaryConfig::from_env()?,
            rate_limit: RateLimitConfig::from_env()?,
        })
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name.to_string())),
        Err(_) => Ok(default),
    }
}

fn required_var(name: &str) -> Result<String, ConfigError> {
    env::var(name).map_err(|_| ConfigError::Missing(name.to_string()))
}

/// Split a comma-separated origin list, dropping blanks
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.trim_end_matches('/').to_string())
        .collect()
}

/// Parse an HMAC algorithm name. Asymmetric algorithms need key files we don't load.
pub fn parse_jwt_algorithm(raw: &str) -> Result<Algorithm, ConfigError> {
    match Algorithm::from_str(raw.trim()) {
        Ok(alg @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)) => Ok(alg),
        _ => Err(ConfigError::InvalidValue("JWT_ALGORITHM".to_string())),
    }
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            port: parse_var("SERVER_PORT", DEFAULT_SERVER_PORT)?,
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string()),
            cors_origins: parse_origins(
                &env::var("CORS_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGIN.to_string()),
            ),
            public_base_url: env::var("PUBLIC_BASE_URL").ok().filter(|s| !s.is_empty()),
        })
    }

    /// True when a production-style deployment (JSON logs) builds verification
    /// links from the client-supplied `Host` header
    pub fn links_use_request_host(&self) -> bool {
        self.public_base_url.is_none() && self.log_format.eq_ignore_ascii_case("json")
    }
}

impl DatabaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: required_var("DATABASE_URL")?,
            max_connections: parse_var("DATABASE_MAX_CONNECTIONS", DEFAULT_DATABASE_MAX_CONNECTIONS)?,
        })
    }
}

impl RedisConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env::var("REDIS_URL").unwrap_or_else(|_| DEFAULT_REDIS_URL.to_string()),
            user_cache_ttl_seconds: parse_var("USER_CACHE_TTL_SECONDS", DEFAULT_USER_CACHE_TTL_SECONDS)?,
        })
    }
}

impl JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            secret: required_var("JWT_SECRET")?,
            algorithm: parse_jwt_algorithm(
                &env::var("JWT_ALGORITHM").unwrap_or_else(|_| DEFAULT_JWT_ALGORITHM.to_string()),
            )?,
            expiration_seconds: parse_var("JWT_EXPIRATION_SECONDS", DEFAULT_JWT_EXPIRATION_SECONDS)?,
        })
    }
}

impl MailConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_url: env::var("MAIL_API_URL").unwrap_or_else(|_| DEFAULT_MAIL_API_URL.to_string()),
            api_token: env::var("MAIL_API_TOKEN").unwrap_or_default(),
            from: required_var("MAIL_FROM")?,
            from_name: env::var("MAIL_FROM_NAME")
                .unwrap_or_else(|_| DEFAULT_MAIL_FROM_NAME.to_string()),
            timeout_seconds: parse_var("MAIL_TIMEOUT_SECONDS", DEFAULT_MAIL_TIMEOUT_SECONDS)?,
        })
    }
}

impl CloudinaryConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            cloud_name: required_var("CLD_NAME")?,
            api_key: required_var("CLD_API_KEY")?,
            api_secret: required_var("CLD_API_SECRET")?,
            api_base: env::var("CLD_API_BASE")
                .unwrap_or_else(|_| DEFAULT_CLOUDINARY_API_BASE.to_string()),
        })
    }
}

impl RateLimitConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            me_max_requests: parse_var("ME_RATE_LIMIT", rate_limits::ME_MAX_REQUESTS)?,
            me_window_seconds: parse_var("ME_RATE_WINDOW_SECONDS", rate_limits::ME_WINDOW_SECS)?,
        })
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}
