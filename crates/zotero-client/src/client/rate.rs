//! Request pacing against the service's rate ceiling.
//!
//! All outbound traffic funnels through [`RateGovernor::send`], which
//! admits one request at a time per client instance and enforces:
//!
//! - a minimum spacing between consecutive requests,
//! - a server-declared backoff window (`Backoff: <secs>` header),
//! - a single bounded retry on a throttling (429) response.
//!
//! The state lock is held across the whole exchange, so suspension is
//! cooperative and sequential and no two requests are ever in flight
//! from one instance.

use std::time::Duration;

use reqwest::header::HeaderValue;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep, sleep_until};
use tracing::{debug, warn};

use crate::config::api;
use crate::error::{ClientError, ClientResult};

/// Mutable pacing state, owned by one client instance.
#[derive(Debug, Default)]
struct RateState {
    /// When the last request was sent.
    last_request: Option<Instant>,
    /// Deadline until which all requests must be deferred.
    backoff_until: Option<Instant>,
}

/// Serializes requests from one client instance against the rate rules.
#[derive(Debug)]
pub(crate) struct RateGovernor {
    min_interval: Duration,
    state: Mutex<RateState>,
}

impl RateGovernor {
    pub(crate) fn new(min_interval: Duration) -> Self {
        Self { min_interval, state: Mutex::new(RateState::default()) }
    }

    /// Execute one request, honoring backoff and spacing, with exactly
    /// one retry on a throttling response. The second attempt's result
    /// is returned regardless of outcome.
    pub(crate) async fn send(
        &self,
        operation: &'static str,
        request: reqwest::RequestBuilder,
    ) -> ClientResult<reqwest::Response> {
        let mut state = self.state.lock().await;

        // Clone up front so a throttled request can be replayed.
        let replay = request.try_clone();

        self.admit(&mut state).await;
        state.last_request = Some(Instant::now());
        debug!(operation, "dispatching request");
        let response = request.send().await?;
        Self::note_backoff(&mut state, &response);

        if response.status() != reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Ok(response);
        }

        let wait = parse_secs(response.headers().get("Retry-After"))
            .unwrap_or(api::DEFAULT_RETRY_WAIT);
        let Some(replay) = replay else {
            return Err(ClientError::RequestNotReplayable { operation });
        };

        warn!(operation, wait_ms = wait.as_millis() as u64, "throttled, retrying once");
        sleep(wait).await;
        state.last_request = Some(Instant::now());
        let response = replay.send().await?;
        Self::note_backoff(&mut state, &response);
        Ok(response)
    }

    /// Wait out an active backoff window, then the minimum interval.
    async fn admit(&self, state: &mut RateState) {
        if let Some(deadline) = state.backoff_until.take() {
            let now = Instant::now();
            if now < deadline {
                warn!(
                    wait_ms = (deadline - now).as_millis() as u64,
                    "deferring request until backoff deadline"
                );
                sleep_until(deadline).await;
            }
        }
        if let Some(last) = state.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                sleep(self.min_interval - elapsed).await;
            }
        }
    }

    /// Record a `Backoff` directive from the response, if present.
    fn note_backoff(state: &mut RateState, response: &reqwest::Response) {
        if let Some(wait) = parse_secs(response.headers().get("Backoff")) {
            warn!(wait_ms = wait.as_millis() as u64, "server requested backoff");
            state.backoff_until = Some(Instant::now() + wait);
        }
    }
}

/// Parse a whole-seconds header value into a duration.
fn parse_secs(value: Option<&HeaderValue>) -> Option<Duration> {
    let secs: u64 = value?.to_str().ok()?.trim().parse().ok()?;
    Some(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_secs() {
        assert_eq!(
            parse_secs(Some(&HeaderValue::from_static("30"))),
            Some(Duration::from_secs(30))
        );
        assert_eq!(
            parse_secs(Some(&HeaderValue::from_static(" 5 "))),
            Some(Duration::from_secs(5))
        );
        assert_eq!(parse_secs(Some(&HeaderValue::from_static("soon"))), None);
        assert_eq!(parse_secs(None), None);
    }
}
