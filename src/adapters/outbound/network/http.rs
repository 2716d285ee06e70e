use std::time::Duration;

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::shared::{Fetched, Result};

/// Retry/backoff policy for one class of upstream calls.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,
    /// Base backoff delay; attempt n waits `base * 2^(n-1)` afterwards.
    pub base_delay: Duration,
    /// Hard bound per attempt; an in-flight call is aborted when exceeded.
    pub per_attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
            per_attempt_timeout: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Policy for optional enrichment calls: at most one retry and a short
    /// timeout, so a slow enrichment service never stalls a scan.
    pub fn enrichment() -> Self {
        Self {
            max_attempts: 2,
            base_delay: Duration::from_millis(500),
            per_attempt_timeout: Duration::from_secs(3),
        }
    }
}

/// HTTP client wrapper used by every upstream integration.
///
/// Failure is a normal, expected outcome for third-party dependencies:
/// after `max_attempts` failed tries the client yields `None` / `Unavailable`
/// rather than an error, and no transport exception ever propagates past
/// this boundary. The wrapped `reqwest::Client` is cheap to clone (clones
/// share the connection pool), so the composition root builds one and hands
/// clones to each adapter.
#[derive(Debug, Clone)]
pub struct ResilientClient {
    client: reqwest::Client,
    policy: RetryPolicy,
}

impl ResilientClient {
    /// Creates a client with its own connection pool and default policy.
    pub fn new() -> Result<Self> {
        let version = env!("CARGO_PKG_VERSION");
        let user_agent = format!("pkgtrust/{}", version);
        let client = reqwest::Client::builder().user_agent(user_agent).build()?;

        Ok(Self {
            client,
            policy: RetryPolicy::default(),
        })
    }

    /// Wraps an existing `reqwest::Client`, sharing its pool.
    pub fn from_client(client: reqwest::Client, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    /// Returns a copy of this client with a different retry policy, sharing
    /// the underlying connection pool.
    pub fn with_policy(&self, policy: RetryPolicy) -> Self {
        Self {
            client: self.client.clone(),
            policy,
        }
    }

    /// The wrapped `reqwest::Client`, for adapters that need to build
    /// requests with custom headers or bodies before passing them through
    /// [`ResilientClient::execute_with_retry`].
    pub fn inner(&self) -> &reqwest::Client {
        &self.client
    }

    /// Executes a request with bounded attempts and exponential backoff.
    ///
    /// Each attempt is bounded by the policy's per-attempt timeout;
    /// exceeding it drops the in-flight call. Retryable failures are
    /// timeouts, connection errors, 5xx and 429 responses. A 404 returns
    /// `None` immediately: a missing package will not appear on retry.
    ///
    /// # Arguments
    /// * `request` - Builder invoked once per attempt (bodies cannot be
    ///   reused across attempts)
    ///
    /// # Returns
    /// The successful response, or `None` after all attempts failed.
    pub async fn execute_with_retry<F>(&self, mut request: F) -> Option<Response>
    where
        F: FnMut() -> RequestBuilder,
    {
        for attempt in 1..=self.policy.max_attempts {
            let outcome =
                tokio::time::timeout(self.policy.per_attempt_timeout, request().send()).await;

            match outcome {
                Ok(Ok(response)) => {
                    let status = response.status();
                    if status.is_success() {
                        return Some(response);
                    }
                    if status.as_u16() == 404 {
                        tracing::debug!(%status, "resource not found, not retrying");
                        return None;
                    }
                    if !retryable_status(status.as_u16()) {
                        tracing::debug!(%status, "non-retryable status");
                        return None;
                    }
                    tracing::debug!(
                        %status,
                        attempt,
                        max_attempts = self.policy.max_attempts,
                        "upstream returned retryable status"
                    );
                }
                Ok(Err(error)) => {
                    tracing::debug!(
                        %error,
                        attempt,
                        max_attempts = self.policy.max_attempts,
                        "request failed"
                    );
                }
                Err(_) => {
                    tracing::debug!(
                        timeout_ms = self.policy.per_attempt_timeout.as_millis() as u64,
                        attempt,
                        max_attempts = self.policy.max_attempts,
                        "request timed out"
                    );
                }
            }

            if attempt < self.policy.max_attempts {
                tokio::time::sleep(self.backoff_delay(attempt)).await;
            }
        }

        None
    }

    /// Issues a GET and decodes the JSON body; the "safe JSON parse"
    /// companion. Decode failures collapse to `Unavailable`.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Fetched<T> {
        let response = self.execute_with_retry(|| self.client.get(url)).await;
        decode_json(response).await
    }

    /// Backoff before the next attempt: `base * 2^(attempt-1)`.
    fn backoff_delay(&self, attempt: u32) -> Duration {
        self.policy.base_delay * 2u32.saturating_pow(attempt - 1)
    }
}

/// Decodes a possibly-absent response body into a possibly-absent payload.
///
/// Every upstream integration funnels through this instead of propagating
/// decode errors.
pub async fn decode_json<T: DeserializeOwned>(response: Option<Response>) -> Fetched<T> {
    match response {
        Some(response) => match response.json::<T>().await {
            Ok(payload) => Fetched::Available(payload),
            Err(error) => {
                tracing::debug!(%error, "failed to decode upstream payload");
                Fetched::Unavailable
            }
        },
        None => Fetched::Unavailable,
    }
}

/// 5xx and rate-limit responses are worth retrying; other client errors
/// are not (the answer will not change).
fn retryable_status(status: u16) -> bool {
    status >= 500 || status == 429
}

/// Validates a value interpolated into a registry URL path.
///
/// # Security
/// Prevents path traversal and URL injection through package names or
/// versions taken from manifests.
pub fn validate_url_component(component: &str, component_type: &str) -> Result<()> {
    if component.contains("..") {
        anyhow::bail!(
            "Security: {} contains '..' which is not allowed",
            component_type
        );
    }

    if component.contains('#') || component.contains('?') || component.contains('\\') {
        anyhow::bail!(
            "Security: {} contains URL-unsafe characters",
            component_type
        );
    }

    Ok(())
}
