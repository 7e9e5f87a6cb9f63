//! Business logic services

pub mod auth_service;
pub mod contact_service;
pub mod email_service;
pub mod upload_service;
pub mod user_service;

pub use auth_service::AuthService;
pub use contact_service::ContactService;
pub use email_service::EmailClient;
pub use upload_service::UploadFileService;
pub use user_service::UserService;
