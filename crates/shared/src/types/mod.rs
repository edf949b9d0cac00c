//! Common types used across the application.

pub mod id;
pub mod limit;
pub mod money;

pub use id::*;
pub use limit::ListLimit;
pub use money::{Currency, Money};
