//! Domain models
//!
//! This module contains all domain models used throughout the application.

pub mod contact;
pub mod user;

pub use contact::*;
pub use user::*;
