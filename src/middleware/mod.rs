mod auth;
mod error_handler;

pub use auth::{admin_middleware, auth_middleware};
pub use error_handler::log_errors;
