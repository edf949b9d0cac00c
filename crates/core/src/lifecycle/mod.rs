//! Shared pieces of the school, subscription, and payment status machines.
//!
//! # Modules
//!
//! - `error` - Lifecycle error types
//! - `calendar` - Calendar-aware date arithmetic for contract and trial terms

pub mod calendar;
pub mod error;

pub use calendar::{add_months, add_years};
pub use error::LifecycleError;
