//! RxCUI terminology lookup

use tracing::{info, instrument};

use crate::dailymed::models::{Page, RxConcept};
use crate::dailymed::query::{RxcuiQuery, validate_pagination};
use crate::error::Result;

use super::DailyMedClient;

impl DailyMedClient {
    /// Look up RxNorm concepts by identifier, display string or term type
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dailymed_client::{DailyMedClient, RxcuiQuery};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = DailyMedClient::new();
    ///     let page = client
    ///         .lookup_rxcuis(&RxcuiQuery::new().rxstring("ibuprofen").rxtty("IN"))
    ///         .await?;
    ///     for concept in &page.items {
    ///         println!("{:?} {:?}", concept.rxcui, concept.rxstring);
    ///     }
    ///     Ok(())
    /// }
    /// ```
    #[instrument(skip(self, query), fields(rxstring = ?query.rxstring, rxtty = ?query.rxtty))]
    pub async fn lookup_rxcuis(&self, query: &RxcuiQuery) -> Result<Page<RxConcept>> {
        validate_pagination(query.page, query.pagesize)?;
        let page: Page<RxConcept> = self.get_page("rxcuis.json", &query.to_params()).await?;
        info!(concepts = page.len(), "RxCUI lookup completed");
        Ok(page)
    }
}
