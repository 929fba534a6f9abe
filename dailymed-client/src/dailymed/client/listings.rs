//! Paged DailyMed listings: drug names, NDCs, drug classes and UNIIs

use tracing::instrument;

use crate::dailymed::models::{DrugClass, DrugName, NdcEntry, Page, Unii};
use crate::dailymed::query::{
    DrugClassQuery, DrugNameQuery, NdcQuery, UniiQuery, validate_pagination,
};
use crate::error::Result;

use super::DailyMedClient;

impl DailyMedClient {
    /// List drug names, optionally restricted to a manufacturer
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dailymed_client::{DailyMedClient, DrugNameQuery};
    /// use dailymed_client::dailymed::query::NameType;
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = DailyMedClient::new();
    ///     let page = client
    ///         .get_drug_names(&DrugNameQuery::new().name_type(NameType::Brand).pagesize(20))
    ///         .await?;
    ///     for name in &page.items {
    ///         println!("{:?}", name.drug_name);
    ///     }
    ///     Ok(())
    /// }
    /// ```
    #[instrument(skip(self, query), fields(page = query.page))]
    pub async fn get_drug_names(&self, query: &DrugNameQuery) -> Result<Page<DrugName>> {
        validate_pagination(query.page, query.pagesize)?;
        self.get_page("drugnames.json", &query.to_params()).await
    }

    #[instrument(skip(self, query), fields(page = query.page))]
    pub async fn get_ndcs(&self, query: &NdcQuery) -> Result<Page<NdcEntry>> {
        query.validate()?;
        self.get_page("ndcs.json", &query.to_params()).await
    }

    /// List pharmacologic classes
    #[instrument(skip(self, query), fields(page = query.page))]
    pub async fn get_drug_classes(&self, query: &DrugClassQuery) -> Result<Page<DrugClass>> {
        validate_pagination(query.page, query.pagesize)?;
        self.get_page("drugclasses.json", &query.to_params()).await
    }

    #[instrument(skip(self, query), fields(page = query.page))]
    pub async fn get_uniis(&self, query: &UniiQuery) -> Result<Page<Unii>> {
        validate_pagination(query.page, query.pagesize)?;
        self.get_page("uniis.json", &query.to_params()).await
    }
}
