//! Token bucket rate limiting for outbound DailyMed requests
//!
//! DailyMed publishes no hard quota, but bursts of detail-document fetches
//! from the advanced search are throttled client-side so that concurrent
//! fetches stay polite.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};
use tracing::{debug, instrument};

/// Default request rate (requests per second)
pub const DEFAULT_RATE_LIMIT: f64 = 5.0;

/// Token bucket rate limiter shared by every clone of a transport
#[derive(Clone, Debug)]
pub struct RateLimiter {
    bucket: Arc<Mutex<TokenBucket>>,
    rate: f64,
}

#[derive(Debug)]
struct TokenBucket {
    tokens: f64,
    capacity: f64,
    refill_rate: f64, // tokens per second
    last_refill: Instant,
}

impl TokenBucket {
    fn refill(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_refill).as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.refill_rate).min(self.capacity);
        self.last_refill = now;
    }
}

impl RateLimiter {
    /// Create a new rate limiter allowing `rate` requests per second
    ///
    /// Non-positive or non-finite rates fall back to [`DEFAULT_RATE_LIMIT`].
    ///
    /// # Examples
    ///
    /// ```
    /// use dailymed_client::RateLimiter;
    ///
    /// let limiter = RateLimiter::new(5.0);
    /// assert_eq!(limiter.rate(), 5.0);
    /// ```
    pub fn new(rate: f64) -> Self {
        let rate = if rate.is_finite() && rate > 0.0 {
            rate
        } else {
            DEFAULT_RATE_LIMIT
        };
        let capacity = rate.max(1.0);
        Self {
            bucket: Arc::new(Mutex::new(TokenBucket {
                tokens: capacity,
                capacity,
                refill_rate: rate,
                last_refill: Instant::now(),
            })),
            rate,
        }
    }

    /// Acquire a token, waiting until one is available
    #[instrument(skip(self))]
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut bucket = self.bucket.lock().await;
                bucket.refill();

                if bucket.tokens >= 1.0 {
                    bucket.tokens -= 1.0;
                    debug!(remaining_tokens = %bucket.tokens, "Token acquired");
                    return;
                }

                let missing = 1.0 - bucket.tokens;
                Duration::from_secs_f64(missing / bucket.refill_rate)
            };

            debug!(wait_ms = wait.as_millis() as u64, "Waiting for rate limit");
            sleep(wait).await;
        }
    }

    /// Current token count (for testing and monitoring)
    pub async fn token_count(&self) -> f64 {
        let mut bucket = self.bucket.lock().await;
        bucket.refill();
        bucket.tokens
    }

    /// Configured rate (requests per second)
    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_RATE_LIMIT)
    }
}
