mod listings;
mod rxcui;
mod spl;

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use crate::config::{ClientConfig, ResponseFormat};
use crate::dailymed::models::{Page, Pagination, SplSearchPage};
use crate::dailymed::query::SplQuery;
use crate::dailymed::responses::{ListEnvelope, RawMetadata, RawSplRow, SplListXml};
use crate::error::{DailyMedError, Result};
use crate::transport::{HttpTransport, QueryParams, Transport};

/// Client for the DailyMed v2 REST services
///
/// Cloning is cheap; clones share the underlying transport (and therefore its
/// rate limiter).
#[derive(Clone)]
pub struct DailyMedClient {
    transport: Arc<dyn Transport>,
    search_format: ResponseFormat,
}

impl fmt::Debug for DailyMedClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DailyMedClient")
            .field("search_format", &self.search_format)
            .finish_non_exhaustive()
    }
}

impl Default for DailyMedClient {
    fn default() -> Self {
        Self::new()
    }
}

impl DailyMedClient {
    /// Create a client with default configuration
    ///
    /// # Example
    ///
    /// ```
    /// use dailymed_client::DailyMedClient;
    ///
    /// let client = DailyMedClient::new();
    /// ```
    pub fn new() -> Self {
        Self::with_config(ClientConfig::new())
    }

    /// Create a client backed by [`HttpTransport`]
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    /// use dailymed_client::{ClientConfig, DailyMedClient, RetryConfig};
    ///
    /// let config = ClientConfig::new()
    ///     .with_timeout(Duration::from_secs(30))
    ///     .with_retry_config(RetryConfig::new().with_max_retries(2));
    ///
    /// let client = DailyMedClient::with_config(config);
    /// ```
    pub fn with_config(config: ClientConfig) -> Self {
        let transport = HttpTransport::new(&config);
        Self {
            transport: Arc::new(transport),
            search_format: config.search_format,
        }
    }

    /// Create a client around any [`Transport`] implementation
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            search_format: ResponseFormat::default(),
        }
    }

    /// Choose between `spls.json` and `spls.xml` for searches
    pub fn with_search_format(mut self, format: ResponseFormat) -> Self {
        self.search_format = format;
        self
    }

    pub fn search_format(&self) -> ResponseFormat {
        self.search_format
    }

    pub(crate) async fn get_text(&self, endpoint: &str, params: &QueryParams) -> Result<String> {
        self.transport.get(endpoint, params).await
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &QueryParams,
    ) -> Result<T> {
        let body = self.get_text(endpoint, params).await?;
        decode_json(&body)
    }

    /// Fetch and unwrap a `{ metadata, data: [...] }` listing
    pub(crate) async fn get_page<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &QueryParams,
    ) -> Result<Page<T>> {
        let envelope: ListEnvelope<T> = self.get_json(endpoint, params).await?;
        let pagination = check_metadata(envelope.metadata)?;
        debug!(
            endpoint = endpoint,
            items = envelope.data.len(),
            total = ?pagination.total_elements,
            "Decoded listing page"
        );
        Ok(Page {
            items: envelope.data,
            pagination,
        })
    }

    /// Run the remote SPL search for a single page
    ///
    /// Rows without a usable SET ID are skipped and counted in
    /// [`SplSearchPage::malformed_rows`]. The page is never followed
    /// automatically.
    ///
    /// # Errors
    ///
    /// * `DailyMedError::InvalidQuery` - pagination or identifiers are invalid
    /// * `DailyMedError::RemoteUnavailable` - the service could not be reached
    /// * `DailyMedError::RemoteRejected` - the service answered with an error status
    /// * `DailyMedError::MalformedResponse` - the payload has no result list
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dailymed_client::{DailyMedClient, SplQuery};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = DailyMedClient::new();
    ///     let page = client
    ///         .search_spls(&SplQuery::new().drug_name("aspirin").pagesize(5))
    ///         .await?;
    ///
    ///     for spl in &page.items {
    ///         println!("{} {}", spl.set_id, spl.display_name());
    ///     }
    ///     Ok(())
    /// }
    /// ```
    #[instrument(skip(self, query), fields(drug_name = ?query.get_drug_name(), page = query.get_page()))]
    pub async fn search_spls(&self, query: &SplQuery) -> Result<SplSearchPage> {
        query.validate()?;

        let endpoint = format!("spls.{}", self.search_format.extension());
        let body = self.get_text(&endpoint, &query.to_params()).await?;
        let page = decode_spl_search(&body)?;

        info!(
            returned = page.items.len(),
            malformed = page.malformed_rows,
            total = ?page.pagination.total_elements,
            "SPL search completed"
        );
        Ok(page)
    }
}

pub(crate) fn decode_json<T: DeserializeOwned>(body: &str) -> Result<T> {
    if body.trim().is_empty() {
        return Err(DailyMedError::MalformedResponse(
            "empty response body".to_string(),
        ));
    }
    Ok(serde_json::from_str(body)?)
}

/// Surface an in-band `error_message` and convert the paging metadata
pub(crate) fn check_metadata(metadata: Option<RawMetadata>) -> Result<Pagination> {
    let metadata = metadata.unwrap_or_default();
    if let Some(message) = &metadata.error_message {
        return Err(DailyMedError::rejected(200, message));
    }
    Ok(metadata.into_pagination())
}

/// Decode a `spls` payload in either JSON or XML form
pub(crate) fn decode_spl_search(body: &str) -> Result<SplSearchPage> {
    let trimmed = body.trim_start();
    let (metadata, rows) = match trimmed.chars().next() {
        Some('<') => decode_spl_search_xml(trimmed)?,
        Some(_) => decode_spl_search_json(trimmed)?,
        None => {
            return Err(DailyMedError::MalformedResponse(
                "empty response body".to_string(),
            ));
        }
    };

    let pagination = check_metadata(metadata)?;
    let mut items = Vec::with_capacity(rows.len());
    let mut malformed_rows = 0;

    for (index, row) in rows.into_iter().enumerate() {
        match row.and_then(RawSplRow::into_summary) {
            Ok(summary) => items.push(summary),
            Err(reason) => {
                malformed_rows += 1;
                warn!(row = index, reason = %reason, "Skipping malformed search row");
            }
        }
    }

    Ok(SplSearchPage {
        items,
        pagination,
        malformed_rows,
    })
}

type DecodedRows = (
    Option<RawMetadata>,
    Vec<std::result::Result<RawSplRow, String>>,
);

fn decode_spl_search_json(body: &str) -> Result<DecodedRows> {
    let envelope: ListEnvelope<serde_json::Value> = decode_json(body)?;
    let rows = envelope
        .data
        .into_iter()
        .map(|value| serde_json::from_value::<RawSplRow>(value).map_err(|err| err.to_string()))
        .collect();
    Ok((envelope.metadata, rows))
}

fn decode_spl_search_xml(body: &str) -> Result<DecodedRows> {
    let document: SplListXml = quick_xml::de::from_str(body)
        .map_err(|err| DailyMedError::MalformedResponse(format!("XML decoding failed: {err}")))?;
    let rows = document.rows.into_iter().map(Ok).collect();
    Ok((document.metadata, rows))
}
