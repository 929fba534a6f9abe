//! Client configuration
//!
//! All knobs are explicit values handed to [`crate::HttpTransport`]; nothing
//! is read from global state.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::rate_limit::{DEFAULT_RATE_LIMIT, RateLimiter};
use crate::retry::RetryConfig;

/// Base URL of the DailyMed v2 REST services
pub const DEFAULT_BASE_URL: &str = "https://dailymed.nlm.nih.gov/dailymed/services/v2";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Payload flavour requested from endpoints that serve both JSON and XML
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    #[default]
    Json,
    Xml,
}

impl ResponseFormat {
    /// File extension used by DailyMed to select the format
    pub fn extension(&self) -> &'static str {
        match self {
            ResponseFormat::Json => "json",
            ResponseFormat::Xml => "xml",
        }
    }
}

/// Configuration for DailyMed clients
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use dailymed_client::ClientConfig;
///
/// let config = ClientConfig::new()
///     .with_timeout(Duration::from_secs(30))
///     .with_rate_limit(2.0);
///
/// assert_eq!(config.effective_rate_limit(), 2.0);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Option<String>,
    pub user_agent: Option<String>,
    pub timeout: Duration,
    pub rate_limit: Option<f64>,
    pub retry_config: RetryConfig,
    pub search_format: ResponseFormat,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            user_agent: None,
            timeout: DEFAULT_TIMEOUT,
            rate_limit: None,
            retry_config: RetryConfig::default(),
            search_format: ResponseFormat::default(),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point the client at another deployment (or a mock server)
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Requests per second allowed by the client-side limiter
    pub fn with_rate_limit(mut self, rate: f64) -> Self {
        self.rate_limit = Some(rate);
        self
    }

    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    /// Format requested from the SPL search endpoint
    pub fn with_search_format(mut self, format: ResponseFormat) -> Self {
        self.search_format = format;
        self
    }

    pub fn effective_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("dailymed-client/{}", env!("CARGO_PKG_VERSION")))
    }

    pub fn effective_rate_limit(&self) -> f64 {
        self.rate_limit.unwrap_or(DEFAULT_RATE_LIMIT)
    }

    pub fn create_rate_limiter(&self) -> RateLimiter {
        RateLimiter::new(self.effective_rate_limit())
    }
}
