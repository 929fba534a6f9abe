//! Retry policy for the HTTP transport
//!
//! The core never retries on its own. Retries are an opt-in property of the
//! transport: a default [`RetryConfig`] performs exactly one attempt.

use std::future::Future;
use std::time::Duration;

use tokio_retry::RetryIf;
use tokio_retry::strategy::jitter;
use tracing::warn;

/// Errors that know whether repeating the request could succeed
pub trait RetryableError {
    /// Whether the failed operation is worth repeating
    fn is_retryable(&self) -> bool;

    /// Short human-readable classification used in logs
    fn retry_reason(&self) -> &str;
}

/// Backoff settings for transient transport failures
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Number of retries after the first attempt
    pub max_retries: usize,
    /// Delay before the first retry; doubled on each subsequent retry
    pub initial_delay: Duration,
    /// Upper bound for a single delay
    pub max_delay: Duration,
    /// Randomize delays to avoid synchronized retries
    pub use_jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            use_jitter: true,
        }
    }
}

impl RetryConfig {
    /// Single attempt, no retries
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub fn without_jitter(mut self) -> Self {
        self.use_jitter = false;
        self
    }

    /// Delays between attempts, in order
    pub fn delays(&self) -> Vec<Duration> {
        (0..self.max_retries)
            .map(|attempt| {
                let factor = 2u32.saturating_pow(attempt.min(16) as u32);
                let delay = self.initial_delay.saturating_mul(factor).min(self.max_delay);
                if self.use_jitter { jitter(delay) } else { delay }
            })
            .collect()
    }
}

/// Run `operation`, retrying retryable failures according to `config`
pub async fn with_retry<T, E, F, Fut>(operation: F, config: &RetryConfig, context: &str) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: RetryableError + std::fmt::Display,
{
    RetryIf::start(config.delays(), operation, |err: &E| {
        let retry = err.is_retryable();
        if retry {
            warn!(
                context = context,
                reason = err.retry_reason(),
                error = %err,
                "Transient failure, retrying"
            );
        }
        retry
    })
    .await
}
