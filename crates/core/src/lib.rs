//! Core business logic for SmartGen.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, status machines, and calculations live here.
//!
//! # Modules
//!
//! - `school` - School registration records and approval transitions
//! - `subscription` - Subscription lifecycle state machine
//! - `payment` - Payment orders and gateway signature verification
//! - `pricing` - Static product catalogue
//! - `auth` - Password hashing and the admin session registry
//! - `rate_limit` - Fixed-window request limiter
//! - `store` - Persistence contract implemented by the db crate

pub mod audit;
pub mod auth;
pub mod clock;
pub mod dashboard;
pub mod document;
pub mod lifecycle;
pub mod payment;
pub mod pricing;
pub mod rate_limit;
pub mod school;
pub mod store;
pub mod subscription;
pub mod token;
