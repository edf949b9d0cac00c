//! Gateway payment signatures.
//!
//! The gateway signs `"{order_id}|{payment_id}"` with HMAC-SHA256 keyed by the
//! shared secret and sends the lowercase hex digest.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use smartgen_shared::AppError;
use smartgen_shared::config::GatewayConfig;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Signature verification failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// No usable secret is configured and strict mode is on.
    #[error("Payment gateway secret is not configured")]
    NotConfigured,

    /// Signature is not a hex string.
    #[error("Malformed payment signature")]
    Malformed,

    /// Signature does not match.
    #[error("Payment signature mismatch")]
    Mismatch,
}

impl From<SignatureError> for AppError {
    fn from(err: SignatureError) -> Self {
        Self::Verification(err.to_string())
    }
}

fn mac_for(secret: &str, order_id: &str, payment_id: &str) -> Result<HmacSha256, SignatureError> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| SignatureError::NotConfigured)?;
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    Ok(mac)
}

/// Computes the hex signature the gateway would send.
pub fn compute_signature(
    secret: &str,
    order_id: &str,
    payment_id: &str,
) -> Result<String, SignatureError> {
    let mac = mac_for(secret, order_id, payment_id)?;
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Verifies gateway signatures, resolved once at startup.
///
/// Without a secret the verifier fails closed in strict mode. With strict
/// mode disabled it accepts every signature (demo bypass).
#[derive(Debug, Clone)]
pub struct SignatureVerifier {
    secret: Option<String>,
    strict: bool,
}

impl SignatureVerifier {
    /// Creates a verifier. Empty secrets count as unconfigured.
    #[must_use]
    pub fn new(secret: Option<&str>, strict: bool) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()).map(str::to_string),
            strict,
        }
    }

    /// Creates a verifier from gateway configuration.
    #[must_use]
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new(config.configured_secret(), config.strict)
    }

    /// Returns true if every signature is accepted.
    #[must_use]
    pub fn is_bypass(&self) -> bool {
        !self.strict && self.secret.is_none()
    }

    /// Checks `signature` for the order and gateway payment id in constant time.
    pub fn verify(
        &self,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> Result<(), SignatureError> {
        let Some(secret) = &self.secret else {
            return if self.strict {
                Err(SignatureError::NotConfigured)
            } else {
                Ok(())
            };
        };

        let supplied = hex::decode(signature.trim()).map_err(|_| SignatureError::Malformed)?;
        mac_for(secret, order_id, payment_id)?
            .verify_slice(&supplied)
            .map_err(|_| SignatureError::Mismatch)
    }
}
