//! Utility functions

pub mod crypto;
pub mod request;
pub mod validation;

pub use crypto::{hash_password, sha256_hex, verify_password};
pub use request::base_url;
