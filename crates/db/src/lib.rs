//! In-memory persistence for SmartGen.
//!
//! This crate provides:
//! - `MemoryStore`, a `dashmap`-backed implementation of `smartgen_core::store::Store`
//! - Admin seeding from configuration

mod memory;
mod seed;

pub use memory::MemoryStore;
pub use seed::seed_admin;
