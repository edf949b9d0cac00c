//! Generated documents (certificates, invoices, agreements).
//!
//! Documents are immutable snapshots: the data captured at generation time
//! never changes, even if the school or subscription does.

pub mod service;
pub mod types;

pub use service::DocumentService;
pub use types::{Document, NewDocument};
