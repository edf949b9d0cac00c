//! Bearer-token sessions for the admin API.
//!
//! Tokens are 256-bit random hex strings. Only their SHA-256 digests are
//! kept, so a dump of the registry cannot be replayed.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use sha2::{Digest, Sha256};
use smartgen_shared::AppError;
use smartgen_shared::types::AdminId;
use thiserror::Error;

use crate::clock::Clock;
use crate::token::random_hex;

const TOKEN_BYTES: usize = 32;

/// Session lookup failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SessionError {
    /// Token was never issued or has been revoked.
    #[error("Invalid session")]
    NotFound,

    /// Token is past its expiry and has been evicted.
    #[error("Session expired")]
    Expired,
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        Self::Unauthorized(err.to_string())
    }
}

/// A freshly issued token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedSession {
    /// Bearer token handed to the client.
    pub token: String,
    /// When the token stops being accepted.
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy)]
struct Session {
    admin_id: AdminId,
    expires_at: DateTime<Utc>,
}

/// Process-wide session table.
pub struct SessionRegistry {
    sessions: DashMap<String, Session>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl SessionRegistry {
    /// Creates an empty registry whose sessions live for `ttl`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            clock,
            ttl,
        }
    }

    fn digest(token: &str) -> String {
        hex::encode(Sha256::digest(token.as_bytes()))
    }

    /// Issues a new token for `admin_id`.
    pub fn issue(&self, admin_id: AdminId) -> IssuedSession {
        let token = random_hex(TOKEN_BYTES);
        let expires_at = self.clock.now() + self.ttl;
        self.sessions.insert(
            Self::digest(&token),
            Session {
                admin_id,
                expires_at,
            },
        );
        IssuedSession { token, expires_at }
    }

    /// Resolves a token to its admin. Expired tokens are evicted.
    pub fn verify(&self, token: &str) -> Result<AdminId, SessionError> {
        let key = Self::digest(token);
        let now = self.clock.now();

        // Copy out so the shard guard is released before any removal.
        let session = self
            .sessions
            .get(&key)
            .map(|entry| *entry)
            .ok_or(SessionError::NotFound)?;

        if now <= session.expires_at {
            Ok(session.admin_id)
        } else {
            self.sessions.remove_if(&key, |_, s| now > s.expires_at);
            Err(SessionError::Expired)
        }
    }

    /// Drops a token. Unknown tokens are ignored.
    pub fn revoke(&self, token: &str) {
        self.sessions.remove(&Self::digest(token));
    }

    /// Evicts every expired session and returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.sessions.len();
        self.sessions.retain(|_, s| now <= s.expires_at);
        before.saturating_sub(self.sessions.len())
    }

    /// Number of live entries, including expired ones not yet purged.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns true if no sessions are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
