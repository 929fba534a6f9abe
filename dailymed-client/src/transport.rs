//! HTTP transport seam
//!
//! Every remote call made by [`crate::DailyMedClient`] goes through the
//! [`Transport`] trait. The production implementation is [`HttpTransport`];
//! tests substitute an in-memory implementation.

use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument, warn};

use crate::config::ClientConfig;
use crate::error::{DailyMedError, Result};
use crate::rate_limit::RateLimiter;
use crate::retry::{RetryConfig, with_retry};

/// Ordered query parameters; absent values are never sent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(&'static str, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<V: ToString>(&mut self, key: &'static str, value: V) -> &mut Self {
        self.0.push((key, value.to_string()));
        self
    }

    pub fn push_opt<V: ToString>(&mut self, key: &'static str, value: Option<V>) -> &mut Self {
        if let Some(value) = value {
            self.push(key, value);
        }
        self
    }

    pub fn as_slice(&self) -> &[(&'static str, String)] {
        &self.0
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// URL-encoded `key=value&...` form
    pub fn to_query_string(&self) -> String {
        self.0
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// A stateless GET-only transport
///
/// Implementations return the body of a successful response and map
/// failures onto [`DailyMedError::RemoteUnavailable`] and
/// [`DailyMedError::RemoteRejected`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `endpoint` (relative to the service root) with `params`
    async fn get(&self, endpoint: &str, params: &QueryParams) -> Result<String>;
}

/// `reqwest`-backed transport with client-side rate limiting and opt-in retries
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    rate_limiter: RateLimiter,
    retry_config: RetryConfig,
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .field("rate", &self.rate_limiter.rate())
            .field("retry_config", &self.retry_config)
            .finish()
    }
}

impl HttpTransport {
    /// Create a transport from configuration
    pub fn new(config: &ClientConfig) -> Self {
        let client = Client::builder()
            .user_agent(config.effective_user_agent())
            .timeout(config.timeout)
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Falling back to default HTTP client");
                Client::new()
            });

        Self::with_client(client, config)
    }

    /// Create a transport around an existing `reqwest` client
    pub fn with_client(client: Client, config: &ClientConfig) -> Self {
        Self {
            client,
            base_url: config.effective_base_url().to_string(),
            rate_limiter: config.create_rate_limiter(),
            retry_config: config.retry_config.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn build_url(&self, endpoint: &str, params: &QueryParams) -> String {
        let mut url = format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'));
        if !params.is_empty() {
            url.push('?');
            url.push_str(&params.to_query_string());
        }
        url
    }

    async fn send_once(&self, url: &str) -> Result<String> {
        self.rate_limiter.acquire().await;
        debug!(url = %url, "Making DailyMed API request");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await.map_err(|err| DailyMedError::RemoteUnavailable {
            message: format!("failed to read response body: {err}"),
        })?;

        if !status.is_success() {
            warn!(status = status.as_u16(), url = %url, "API request failed");
            return Err(DailyMedError::rejected(status.as_u16(), &body));
        }

        Ok(body)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip_all, fields(endpoint = %endpoint))]
    async fn get(&self, endpoint: &str, params: &QueryParams) -> Result<String> {
        let url = self.build_url(endpoint, params);
        let url = url.as_str();

        with_retry(
            move || self.send_once(url),
            &self.retry_config,
            "DailyMed API request",
        )
        .await
        .map_err(|err| match err {
            DailyMedError::RemoteRejected { status: 429, .. } => DailyMedError::RateLimitExceeded,
            other => other,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_params_skip_absent_values() {
        let mut params = QueryParams::new();
        params
            .push("page", 1)
            .push_opt("drug_name", Some("aspirin"))
            .push_opt::<&str>("ndc", None);

        assert_eq!(params.as_slice().len(), 2);
        assert_eq!(params.get("drug_name"), Some("aspirin"));
        assert_eq!(params.get("ndc"), None);
    }

    #[test]
    fn test_query_string_is_encoded() {
        let mut params = QueryParams::new();
        params.push("drug_name", "acetaminophen & codeine");
        assert_eq!(
            params.to_query_string(),
            "drug_name=acetaminophen%20%26%20codeine"
        );
    }

    #[test]
    fn test_build_url() {
        let config = ClientConfig::new().with_base_url("http://localhost:1234/v2/");
        let transport = HttpTransport::new(&config);

        let mut params = QueryParams::new();
        params.push("page", 2).push("pagesize", 5);

        assert_eq!(
            transport.build_url("spls.json", &params),
            "http://localhost:1234/v2/spls.json?page=2&pagesize=5"
        );
        assert_eq!(
            transport.build_url("/spls/abc.xml", &QueryParams::new()),
            "http://localhost:1234/v2/spls/abc.xml"
        );
    }
}
