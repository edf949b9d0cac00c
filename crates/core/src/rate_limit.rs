//! Fixed-window request limiter keyed by client address.
//!
//! The first request from a client opens a window of `window` length with a
//! count of one. Requests inside the window increment the count until it
//! reaches `max_requests`; after that requests are rejected, without counting,
//! until the window has passed.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use smartgen_shared::AppError;
use thiserror::Error;

use crate::clock::Clock;

/// Rejection carrying how long the client should wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Too many requests, retry in {retry_after_secs}s")]
pub struct RateLimitExceeded {
    /// Whole seconds until the window resets, at least one.
    pub retry_after_secs: u64,
    /// Configured maximum per window.
    pub limit: u32,
}

impl From<RateLimitExceeded> for AppError {
    fn from(err: RateLimitExceeded) -> Self {
        Self::RateLimited(err.to_string())
    }
}

/// Budget left after an accepted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    /// Configured maximum per window.
    pub limit: u32,
    /// Requests still allowed in this window.
    pub remaining: u32,
}

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    reset_at: DateTime<Utc>,
}

/// Per-client fixed-window counter.
pub struct FixedWindowLimiter {
    windows: DashMap<String, Window>,
    clock: Arc<dyn Clock>,
    window: Duration,
    max_requests: u32,
}

impl FixedWindowLimiter {
    /// Creates a limiter allowing `max_requests` per `window` per client.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, window: Duration, max_requests: u32) -> Self {
        Self {
            windows: DashMap::new(),
            clock,
            window,
            max_requests,
        }
    }

    /// Counts one request from `client`.
    pub fn check(&self, client: &str) -> Result<RateLimitStatus, RateLimitExceeded> {
        let now = self.clock.now();
        let mut entry = self.windows.entry(client.to_string()).or_insert(Window {
            count: 0,
            reset_at: now + self.window,
        });

        if now > entry.reset_at {
            *entry = Window {
                count: 0,
                reset_at: now + self.window,
            };
        }

        if entry.count >= self.max_requests {
            let wait_ms = u64::try_from((entry.reset_at - now).num_milliseconds()).unwrap_or(0);
            let retry_after_secs = wait_ms.div_ceil(1000).max(1);
            return Err(RateLimitExceeded {
                retry_after_secs,
                limit: self.max_requests,
            });
        }

        entry.count += 1;
        Ok(RateLimitStatus {
            limit: self.max_requests,
            remaining: self.max_requests - entry.count,
        })
    }

    /// Drops windows that have already reset. Returns how many were dropped.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.windows.len();
        self.windows.retain(|_, w| now <= w.reset_at);
        before.saturating_sub(self.windows.len())
    }

    /// Number of tracked clients.
    #[must_use]
    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }
}
