//! Payment orders and gateway signature verification.
//!
//! A payment is created pending when an order is opened for a subscription
//! and settles exactly once, either completed or failed.

pub mod service;
pub mod signature;
pub mod types;

pub use service::PaymentService;
pub use signature::{SignatureError, SignatureVerifier, compute_signature};
pub use types::{NewPayment, Payment, PaymentPatch, PaymentStatus, generate_order_id};
