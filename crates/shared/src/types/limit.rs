//! Result caps for list endpoints.

use serde::{Deserialize, Serialize};

/// Upper bound accepted for any capped list.
pub const MAX_LIST_LIMIT: usize = 500;

/// Optional cap on the number of items a list endpoint returns.
///
/// Absent means "everything".
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ListLimit {
    /// Maximum number of items to return.
    #[serde(default)]
    pub limit: Option<usize>,
}

impl ListLimit {
    /// Returns the effective cap, clamped to `1..=MAX_LIST_LIMIT`.
    #[must_use]
    pub fn effective(&self) -> Option<usize> {
        self.limit.map(|n| n.clamp(1, MAX_LIST_LIMIT))
    }

    /// Truncates `items` to the effective cap.
    #[must_use]
    pub fn apply<T>(&self, mut items: Vec<T>) -> Vec<T> {
        if let Some(cap) = self.effective() {
            items.truncate(cap);
        }
        items
    }
}
