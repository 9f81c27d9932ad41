//! Write-response model for batched create/update calls.

use std::collections::HashMap;

use serde::Deserialize;

/// Per-submission failure in a write response.
#[derive(Debug, Clone, Deserialize)]
pub struct WriteFailure {
    /// Numeric failure code reported by the service.
    pub code: u16,
    pub message: String,
}

/// Outcome of a batched write. The service places every submission
/// index in exactly one of the three maps: created/updated, unchanged
/// (no-op), or failed.
///
/// The HTTP exchange succeeding does not make the write a success; a
/// non-empty `failed` map is a domain failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WriteOutcome {
    /// Submission index to created/updated object key.
    #[serde(rename = "success", default)]
    pub successful: HashMap<String, String>,

    /// Submission index to key of an object the write left untouched.
    #[serde(default)]
    pub unchanged: HashMap<String, String>,

    /// Submission index to failure code and message.
    #[serde(default)]
    pub failed: HashMap<String, WriteFailure>,
}

impl WriteOutcome {
    /// True when no submission was rejected.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Render the failed map as one line per rejected submission, for
    /// error reporting.
    #[must_use]
    pub fn failure_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .failed
            .iter()
            .map(|(index, f)| format!("index {index}: {} {}", f.code, f.message))
            .collect();
        lines.sort();
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_outcome_maps() {
        let outcome: WriteOutcome = serde_json::from_value(serde_json::json!({
            "success": {"0": "NEWKEY11"},
            "unchanged": {"1": "OLDKEY22"},
            "failed": {"2": {"code": 400, "message": "Invalid value"}}
        }))
        .unwrap();

        assert_eq!(outcome.successful.get("0").map(String::as_str), Some("NEWKEY11"));
        assert_eq!(outcome.unchanged.get("1").map(String::as_str), Some("OLDKEY22"));
        assert!(!outcome.is_success());
        assert_eq!(outcome.failure_lines(), vec!["index 2: 400 Invalid value"]);
    }

    #[test]
    fn test_write_outcome_empty_failed_is_success() {
        let outcome: WriteOutcome =
            serde_json::from_value(serde_json::json!({ "success": {"0": "K"} })).unwrap();
        assert!(outcome.is_success());
        assert!(outcome.failure_lines().is_empty());
    }
}
