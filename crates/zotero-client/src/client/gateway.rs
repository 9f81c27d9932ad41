//! Request construction and response classification.
//!
//! The gateway attaches the mandatory header set (protocol version,
//! API key when configured, content type), routes every exchange
//! through the rate governor, and maps non-success statuses to the
//! [`ClientError`] taxonomy with best-effort body diagnostics.

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};

use crate::client::rate::RateGovernor;
use crate::config::{Config, api};
use crate::error::{ClientError, ClientResult};

/// Header naming the protocol version on every request.
const API_VERSION_HEADER: &str = "Zotero-API-Version";

/// Header carrying the credential outside local mode.
const API_KEY_HEADER: &str = "Zotero-API-Key";

/// Idempotency token header for mutating requests.
const WRITE_TOKEN_HEADER: &str = "Zotero-Write-Token";

/// Version precondition header for optimistic-concurrency writes.
const VERSION_HEADER: &str = "If-Unmodified-Since-Version";

/// Total result count reported on list responses.
const TOTAL_RESULTS_HEADER: &str = "Total-Results";

/// Authenticated HTTP front end shared by all client operations.
#[derive(Debug)]
pub(crate) struct Gateway {
    http: reqwest::Client,
    governor: RateGovernor,
}

impl Gateway {
    /// Build the underlying HTTP client with the uniform header set.
    ///
    /// In local mode the key header is omitted entirely; the protocol
    /// version header is always sent.
    pub(crate) fn new(config: &Config) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(API_VERSION_HEADER, HeaderValue::from_static(api::API_VERSION));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if !config.local {
            if let Some(ref key) = config.api_key {
                headers.insert(API_KEY_HEADER, key.parse()?);
            }
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .gzip(true)
            .build()?;

        Ok(Self { http, governor: RateGovernor::new(config.min_request_interval) })
    }

    pub(crate) fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.http.get(url)
    }

    /// POST with a fresh idempotency token.
    pub(crate) fn post(&self, url: &str) -> reqwest::RequestBuilder {
        self.http.post(url).header(WRITE_TOKEN_HEADER, write_token())
    }

    /// PATCH with a fresh idempotency token and the version precondition.
    pub(crate) fn patch(&self, url: &str, unmodified_since: u32) -> reqwest::RequestBuilder {
        self.http
            .patch(url)
            .header(WRITE_TOKEN_HEADER, write_token())
            .header(VERSION_HEADER, unmodified_since)
    }

    /// Execute one exchange through the governor and classify the
    /// response status.
    pub(crate) async fn execute(
        &self,
        operation: &'static str,
        request: reqwest::RequestBuilder,
    ) -> ClientResult<reqwest::Response> {
        let response = self.governor.send(operation, request).await?;
        Self::check_status(operation, response).await
    }

    /// Map a non-success status to a typed failure, appending the body
    /// text for diagnostics. Body-read failures are swallowed.
    async fn check_status(
        operation: &'static str,
        response: reqwest::Response,
    ) -> ClientResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            // Reaching here means the governor's single retry was also
            // throttled; surface it rather than loop.
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok())
                .map_or(api::DEFAULT_RETRY_WAIT, std::time::Duration::from_secs);
            let detail = response.text().await.unwrap_or_default();
            return Err(ClientError::RateLimited { operation, retry_after, detail });
        }

        let detail = response.text().await.unwrap_or_default();
        Err(ClientError::from_status(operation, status, detail))
    }
}

/// Read the total count header from a list response.
pub(crate) fn total_results(response: &reqwest::Response) -> Option<u64> {
    response.headers().get(TOTAL_RESULTS_HEADER)?.to_str().ok()?.trim().parse().ok()
}

/// Filename from a `Content-Disposition` header value, unquoted.
pub(crate) fn disposition_filename(response: &reqwest::Response) -> Option<String> {
    let value = response.headers().get(reqwest::header::CONTENT_DISPOSITION)?.to_str().ok()?;
    let name = value
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))?
        .trim_matches('"');
    if name.is_empty() { None } else { Some(name.to_string()) }
}

/// Fresh idempotency token for a mutating request.
fn write_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_token_is_fresh_and_compact() {
        let a = write_token();
        let b = write_token();
        assert_eq!(a.len(), 32);
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
