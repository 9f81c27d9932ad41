//! Bounded pages over limit/offset parameters and a reported total.

use serde::Serialize;

use crate::config::api;

/// Normalized limit/offset pair for a list request.
///
/// The limit defaults to [`api::DEFAULT_PAGE_LIMIT`] and is clamped to
/// `1..=`[`api::MAX_PAGE_LIMIT`]; the offset defaults to 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: u32,
    pub offset: u32,
}

impl PageRequest {
    #[must_use]
    pub fn new(limit: Option<u32>, offset: Option<u32>) -> Self {
        Self {
            limit: limit.unwrap_or(api::DEFAULT_PAGE_LIMIT).clamp(1, api::MAX_PAGE_LIMIT),
            offset: offset.unwrap_or(0),
        }
    }

    /// Query parameters for this page (`limit` and `start`).
    #[must_use]
    pub fn query(self) -> [(&'static str, String); 2] {
        [("limit", self.limit.to_string()), ("start", self.offset.to_string())]
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One bounded page of results with the server-reported total.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub offset: u32,
    pub limit: u32,
    /// Total matching objects as reported by the service. Falls back
    /// to the returned item count when the total header is absent.
    pub total_results: u64,
}

impl<T> Page<T> {
    #[must_use]
    pub fn new(items: Vec<T>, request: PageRequest, total: Option<u64>) -> Self {
        let total_results = total.unwrap_or(items.len() as u64);
        Self { items, offset: request.offset, limit: request.limit, total_results }
    }

    /// True when `offset + items.len()` has reached the reported total.
    #[must_use]
    pub fn is_last(&self) -> bool {
        u64::from(self.offset) + self.items.len() as u64 >= self.total_results
    }
}
