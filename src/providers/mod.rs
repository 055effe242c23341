/*!
 * Provider implementations for different translation services.
 *
 * This module contains client implementations for various LLM providers:
 * - Ollama: Local LLM server
 * - OpenAI: OpenAI API integration (also used for LM Studio)
 * - Anthropic: Anthropic API integration
 *
 * Retries, backoff and request spacing live here, on the provider side.
 * The subtitle pipeline never retries on its own.
 */

use async_trait::async_trait;
use log::{error, warn};
use std::fmt::Debug;
use std::future::Future;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::errors::ProviderError;

/// Common trait for all LLM providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably in the translation service.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// The request type for this provider
    type Request: Send + Sync;

    /// The response type for this provider
    type Response: Send + Sync;

    /// Complete a request using this provider
    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Extract text from the provider response
    fn extract_text(response: &Self::Response) -> String;
}

/// Retry settings shared by all provider clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retry attempts after the first one
    pub max_retries: u32,
    /// Base backoff time in milliseconds, doubled on each retry
    pub backoff_base_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_base_ms: 1000,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff_base_ms: u64) -> Self {
        Self { max_retries, backoff_base_ms }
    }

    /// Wait before retry number `attempt` (starting at 1)
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let shift = attempt.saturating_sub(1).min(16);
        Duration::from_millis(self.backoff_base_ms.saturating_mul(1u64 << shift))
    }

    /// Run `operation` until it succeeds, fails with a non-retryable error,
    /// or runs out of attempts.
    pub async fn run<T, F, Fut>(&self, label: &str, mut operation: F) -> Result<T, ProviderError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    let backoff = self.backoff_for(attempt);
                    warn!(
                        "{} request failed: {} - attempt {}/{}, retrying in {}ms",
                        label, e, attempt, self.max_retries + 1, backoff.as_millis()
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => {
                    error!("{} request failed after {} attempt(s): {}", label, attempt + 1, e);
                    return Err(e);
                }
            }
        }
    }
}

/// Spaces requests so that at most `rate_limit` start per minute
#[derive(Debug, Default)]
pub struct RequestSpacer {
    interval: Option<Duration>,
    next_slot: Mutex<Option<Instant>>,
}

impl RequestSpacer {
    /// `None` or zero disables spacing
    pub fn new(rate_limit: Option<u32>) -> Self {
        Self {
            interval: rate_limit
                .filter(|rpm| *rpm > 0)
                .map(|rpm| Duration::from_millis(60_000 / u64::from(rpm))),
            next_slot: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    /// Wait for the next free slot
    pub async fn wait(&self) {
        let Some(interval) = self.interval else {
            return;
        };

        let mut next_slot = self.next_slot.lock().await;
        if let Some(at) = *next_slot {
            tokio::time::sleep_until(at).await;
        }
        *next_slot = Some(Instant::now() + interval);
    }
}

/// Turn a non-success HTTP response into a provider error
pub(crate) async fn error_from_response(provider: &str, response: reqwest::Response) -> ProviderError {
    let status = response.status();
    let body = response.text().await
        .unwrap_or_else(|_| "Failed to get error response text".to_string());

    match status.as_u16() {
        401 | 403 => ProviderError::AuthenticationError(format!("{} rejected the credentials: {}", provider, body)),
        429 => ProviderError::RateLimitExceeded(format!("{}: {}", provider, body)),
        status_code => ProviderError::ApiError { status_code, message: body },
    }
}

/// Classify a transport-level reqwest failure
pub(crate) fn error_from_reqwest(provider: &str, error: reqwest::Error) -> ProviderError {
    if error.is_decode() {
        ProviderError::ParseError(format!("{}: {}", provider, error))
    } else if error.is_builder() {
        ProviderError::RequestFailed(format!("{}: {}", provider, error))
    } else {
        ProviderError::ConnectionError(format!("Failed to reach {}: {}", provider, error))
    }
}

pub mod ollama;
pub mod openai;
pub mod anthropic;
