use crate::error::Result;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::warn;

/// Retry behavior for a single endpoint fetch. All failure statuses are
/// treated uniformly, the interval is fixed: no exponential backoff, no
/// jitter. Tests inject a zero backoff to stay fast.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff: Duration::from_secs(1),
        }
    }
}

/// Issues single GETs against fully-formed request targets, sharing the
/// session cookies of the client it was built with.
pub struct Fetcher {
    client: Client,
    retry: RetryPolicy,
}

impl Fetcher {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Fetch one endpoint. `Ok(None)` means the retry budget is exhausted:
    /// callers must treat it as "no data for this node, skip and continue",
    /// never as fatal. A success response whose body does not decode as
    /// JSON is an error and aborts the run.
    pub async fn fetch(&self, url: &str) -> Result<Option<Value>> {
        for attempt in 1..=self.retry.max_attempts {
            match self.client.get(url).send().await {
                Ok(response) if response.status().is_success() => {
                    return Ok(Some(response.json().await?));
                }
                Ok(response) => {
                    warn!(
                        "request failed ({}), attempt {}/{}, retrying in {:?}",
                        response.status(),
                        attempt,
                        self.retry.max_attempts,
                        self.retry.backoff
                    );
                }
                Err(e) => {
                    warn!(
                        "request error ({e}), attempt {}/{}, retrying in {:?}",
                        attempt, self.retry.max_attempts, self.retry.backoff
                    );
                }
            }
            if attempt < self.retry.max_attempts {
                tokio::time::sleep(self.retry.backoff).await;
            }
        }

        warn!("giving up on {url}");
        Ok(None)
    }
}
