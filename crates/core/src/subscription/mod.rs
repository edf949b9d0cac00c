//! Subscription lifecycle management.
//!
//! This module implements the subscription state machine: creation with a
//! fixed quote, payment, admin approval, trial grants, and revocation.
//!
//! # Modules
//!
//! - `types` - Subscription record, status, and patch
//! - `service` - Quotes and state transitions

pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use service::{Quote, SubscriptionService, TRIAL_MONTHS};
pub use types::{NewSubscription, Subscription, SubscriptionPatch, SubscriptionStatus};
