//! Error types for the Zotero API client.
//!
//! Every operation returns either a typed success value or a
//! [`ClientError`] carrying the operation label, a reason category and
//! best-effort diagnostic text, so callers can pattern-match the
//! recoverable cases (not found, version conflict) without string
//! inspection.

use std::time::Duration;

use reqwest::StatusCode;

/// Errors from the client layer.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// HTTP transport error (connection, DNS, TLS, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Invalid request parameters (400)
    #[error("{operation}: bad request: {detail}")]
    BadRequest {
        /// Operation that failed
        operation: &'static str,
        /// Response body, best effort
        detail: String,
    },

    /// Access denied (403)
    #[error("{operation}: forbidden: {detail}")]
    Forbidden {
        /// Operation that failed
        operation: &'static str,
        /// Response body, best effort
        detail: String,
    },

    /// Resource not found (404)
    #[error("{operation}: not found: {detail}")]
    NotFound {
        /// Operation that failed
        operation: &'static str,
        /// Response body, best effort
        detail: String,
    },

    /// Target is locked or conflicted (409)
    #[error("{operation}: conflict: {detail}")]
    Conflict {
        /// Operation that failed
        operation: &'static str,
        /// Response body, best effort
        detail: String,
    },

    /// Version precondition rejected (412). The caller must re-fetch
    /// and retry; the client never auto-retries a version conflict.
    #[error("{operation}: precondition failed (version conflict): {detail}")]
    PreconditionFailed {
        /// Operation that failed
        operation: &'static str,
        /// Response body, best effort
        detail: String,
    },

    /// Request body too large (413)
    #[error("{operation}: payload too large: {detail}")]
    PayloadTooLarge {
        /// Operation that failed
        operation: &'static str,
        /// Response body, best effort
        detail: String,
    },

    /// Rate limited (429), surfaced after the single bounded retry
    #[error("{operation}: rate limited, retry after {retry_after:?}: {detail}")]
    RateLimited {
        /// Operation that failed
        operation: &'static str,
        /// Suggested wait before trying again
        retry_after: Duration,
        /// Response body, best effort
        detail: String,
    },

    /// Service unavailable (503)
    #[error("{operation}: service unavailable: {detail}")]
    ServiceUnavailable {
        /// Operation that failed
        operation: &'static str,
        /// Response body, best effort
        detail: String,
    },

    /// Any other non-success status
    #[error("{operation}: HTTP {status}: {detail}")]
    UnexpectedStatus {
        /// Operation that failed
        operation: &'static str,
        /// HTTP status code
        status: u16,
        /// Response body, best effort
        detail: String,
    },

    /// The server accepted the batch but rejected individual
    /// submissions (non-empty `failed` map in the write response).
    #[error("{operation}: write rejected: {}", failures.join("; "))]
    WriteRejected {
        /// Operation that failed
        operation: &'static str,
        /// One `"index <i>: <code> <message>"` entry per rejected submission
        failures: Vec<String>,
    },

    /// A throttled request could not be replayed because its body is
    /// not clonable. Indicates a bug in request construction.
    #[error("{operation}: request cannot be replayed after throttling")]
    RequestNotReplayable {
        /// Operation that failed
        operation: &'static str,
    },
}

impl ClientError {
    /// Classify a non-success status into the taxonomy.
    #[must_use]
    pub fn from_status(operation: &'static str, status: StatusCode, detail: String) -> Self {
        match status {
            StatusCode::BAD_REQUEST => Self::BadRequest { operation, detail },
            StatusCode::FORBIDDEN => Self::Forbidden { operation, detail },
            StatusCode::NOT_FOUND => Self::NotFound { operation, detail },
            StatusCode::CONFLICT => Self::Conflict { operation, detail },
            StatusCode::PRECONDITION_FAILED => Self::PreconditionFailed { operation, detail },
            StatusCode::PAYLOAD_TOO_LARGE => Self::PayloadTooLarge { operation, detail },
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimited {
                operation,
                retry_after: crate::config::api::DEFAULT_RETRY_WAIT,
                detail,
            },
            StatusCode::SERVICE_UNAVAILABLE => Self::ServiceUnavailable { operation, detail },
            other => Self::UnexpectedStatus { operation, status: other.as_u16(), detail },
        }
    }

    /// Operation label attached to the error, if any.
    #[must_use]
    pub const fn operation(&self) -> Option<&'static str> {
        match self {
            Self::Http(_) | Self::Parse(_) => None,
            Self::BadRequest { operation, .. }
            | Self::Forbidden { operation, .. }
            | Self::NotFound { operation, .. }
            | Self::Conflict { operation, .. }
            | Self::PreconditionFailed { operation, .. }
            | Self::PayloadTooLarge { operation, .. }
            | Self::RateLimited { operation, .. }
            | Self::ServiceUnavailable { operation, .. }
            | Self::UnexpectedStatus { operation, .. }
            | Self::WriteRejected { operation, .. }
            | Self::RequestNotReplayable { operation } => Some(operation),
        }
    }

    /// True for version conflicts the caller should resolve by
    /// re-fetching and retrying.
    #[must_use]
    pub const fn is_version_conflict(&self) -> bool {
        matches!(self, Self::PreconditionFailed { .. })
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
