//! School registration records and the admin approval decision.
//!
//! # Modules
//!
//! - `types` - School record, registration input, status, and patch
//! - `service` - Approve/reject transitions

pub mod service;
pub mod types;

pub use service::SchoolService;
pub use types::{NewSchool, School, SchoolPatch, SchoolStatus, normalize_email};
