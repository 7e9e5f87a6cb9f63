//! HTTP middleware

pub mod auth;
pub mod logging;
pub mod rate_limit;

pub use auth::CurrentUser;
pub use logging::logging_middleware;
pub use rate_limit::me_rate_limit_middleware;
