//! Request middleware.

pub mod auth;
pub mod rate_limit;

pub use auth::{AuthAdmin, auth_middleware};
pub use rate_limit::rate_limit_middleware;
