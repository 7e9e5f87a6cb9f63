//! Database repositories
//!
//! Repositories handle all direct database interactions.

pub mod contact_repo;
pub mod user_repo;

pub use contact_repo::ContactRepository;
pub use user_repo::UserRepository;
