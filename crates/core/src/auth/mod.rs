//! Admin authentication.
//!
//! This module provides:
//! - Admin account records
//! - Password hashing and verification with Argon2id
//! - The bearer-token session registry

mod admin;
mod password;
pub mod session;

pub use admin::{Admin, AdminSummary, NewAdmin};
pub use password::{PasswordError, check_admin_password, hash_password, verify_password};
pub use session::{IssuedSession, SessionError, SessionRegistry};
