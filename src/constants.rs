//! Application-wide constants
//!
//! This module contains all constant values used throughout the application.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8000;

/// Default allowed CORS origin (the frontend dev server)
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";

/// API base path
pub const API_BASE_PATH: &str = "/api";

// =============================================================================
// DATABASE DEFAULTS
// =============================================================================

/// Default maximum database connections in the pool
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;

/// Unique constraint on (name, user_id) in the contacts table
pub const CONTACT_UNIQUE_CONSTRAINT: &str = "unique_contact_user";

// =============================================================================
// REDIS DEFAULTS
// =============================================================================

/// Default Redis URL
pub const DEFAULT_REDIS_URL: &str = "redis://localhost:6379";

/// Default lifetime of a cached user profile in seconds
pub const DEFAULT_USER_CACHE_TTL_SECONDS: u64 = 3600;

/// Cache key for a user profile looked up by username
pub fn user_cache_key(username: &str) -> String {
    format!("user:username:{}", username)
}

// =============================================================================
// AUTHENTICATION DEFAULTS
// =============================================================================

/// Default JWT signing algorithm
pub const DEFAULT_JWT_ALGORITHM: &str = "HS256";

/// Default access token lifetime in seconds
pub const DEFAULT_JWT_EXPIRATION_SECONDS: i64 = 3600;

/// Email verification token lifetime in days
pub const EMAIL_TOKEN_EXPIRY_DAYS: i64 = 7;

/// Token type reported by the login endpoint
pub const TOKEN_TYPE: &str = "bearer";

/// Scopes carried in the `scope` claim
pub mod token_scopes {
    pub const ACCESS: &str = "access_token";
    pub const EMAIL: &str = "email_token";
}

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: u64 = 6;

/// Maximum password length
pub const MAX_PASSWORD_LENGTH: u64 = 128;

/// Username minimum length
pub const MIN_USERNAME_LENGTH: u64 = 3;

/// Username maximum length
pub const MAX_USERNAME_LENGTH: u64 = 50;

// =============================================================================
// USER ROLES
// =============================================================================

/// User role identifiers
pub mod roles {
    pub const ADMIN: &str = "admin";
    pub const USER: &str = "user";
}

// =============================================================================
// CONTACTS
// =============================================================================

/// Maximum contact name length
pub const MAX_CONTACT_NAME_LENGTH: u64 = 50;

/// Maximum contact surname length
pub const MAX_CONTACT_SURNAME_LENGTH: u64 = 50;

/// Maximum contact email length
pub const MAX_CONTACT_EMAIL_LENGTH: u64 = 100;

/// Maximum contact phone length
pub const MAX_CONTACT_PHONE_LENGTH: u64 = 20;

/// Maximum length of free-form contact notes
pub const MAX_CONTACT_EXTRA_INFO_LENGTH: u64 = 250;

/// Default number of contacts returned by the list endpoint
pub const DEFAULT_CONTACTS_LIMIT: i64 = 100;

/// Upper bound for the `limit` query parameter
pub const MAX_CONTACTS_LIMIT: i64 = 100;

// =============================================================================
// MAIL
// =============================================================================

/// Default mail API base URL
pub const DEFAULT_MAIL_API_URL: &str = "https://api.postmarkapp.com";

/// Default sender display name
pub const DEFAULT_MAIL_FROM_NAME: &str = "Contacts API";

/// Default mail API request timeout in seconds
pub const DEFAULT_MAIL_TIMEOUT_SECONDS: u64 = 10;

/// Subject of the verification email
pub const VERIFICATION_EMAIL_SUBJECT: &str = "Confirm your email";

// =============================================================================
// UPLOADS
// =============================================================================

/// Default Cloudinary API base URL
pub const DEFAULT_CLOUDINARY_API_BASE: &str = "https://api.cloudinary.com";

/// Cloudinary delivery host
pub const CLOUDINARY_DELIVERY_BASE: &str = "https://res.cloudinary.com";

/// Folder under which avatars are stored
pub const AVATAR_FOLDER: &str = "RestApp";

/// Avatar edge length in pixels
pub const AVATAR_SIZE_PX: u32 = 250;

/// Maximum accepted avatar upload in bytes (5 MB)
pub const MAX_AVATAR_SIZE: usize = 5 * 1024 * 1024;

// =============================================================================
// RATE LIMITING
// =============================================================================

/// Rate limiting configuration
pub mod rate_limits {
    /// Profile endpoint - max requests
    pub const ME_MAX_REQUESTS: i64 = 10;
    /// Profile endpoint - window in seconds
    pub const ME_WINDOW_SECS: i64 = 60;
}
