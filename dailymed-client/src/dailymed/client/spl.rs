//! Per-SPL detail endpoints

use tracing::{debug, instrument};

use crate::common::SetId;
use crate::dailymed::models::{SplHistory, SplNdcs, SplPackaging};
use crate::dailymed::query::validate_pagination;
use crate::dailymed::responses::{DetailEnvelope, RawHistoryData, RawNdcsData, RawPackagingData};
use crate::error::Result;
use crate::spl::{SplDocument, SplParser};
use crate::transport::QueryParams;

use super::{DailyMedClient, check_metadata};

impl DailyMedClient {
    /// Fetch the raw SPL XML document for a SET ID
    #[instrument(skip(self), fields(set_id = %set_id))]
    pub async fn get_spl_xml(&self, set_id: &SetId) -> Result<String> {
        let endpoint = format!("spls/{set_id}.xml");
        let body = self.get_text(&endpoint, &QueryParams::new()).await?;
        debug!(bytes = body.len(), "Fetched SPL document");
        Ok(body)
    }

    /// Fetch and parse the SPL document for a SET ID
    ///
    /// # Errors
    ///
    /// * `DailyMedError::DocumentUnparseable` - the body is not an SPL document
    /// * any transport error from [`DailyMedClient::get_spl_xml`]
    ///
    /// # Example
    ///
    /// ```no_run
    /// use dailymed_client::{DailyMedClient, SetId};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///     let client = DailyMedClient::new();
    ///     let set_id = SetId::parse("a1b2c3d4-e5f6-7890-abcd-ef1234567890")?;
    ///     let doc = client.fetch_spl_document(&set_id).await?;
    ///
    ///     println!("Active: {:?}", doc.active_ingredient_names());
    ///     for pair in doc.route_forms() {
    ///         println!("{:?} {:?}", pair.route, pair.form);
    ///     }
    ///     Ok(())
    /// }
    /// ```
    #[instrument(skip(self), fields(set_id = %set_id))]
    pub async fn fetch_spl_document(&self, set_id: &SetId) -> Result<SplDocument> {
        let xml = self.get_spl_xml(set_id).await?;
        SplParser::parse(&xml, set_id.as_str())
    }

    /// Version history of an SPL, one page at a time
    #[instrument(skip(self), fields(set_id = %set_id))]
    pub async fn get_spl_history(
        &self,
        set_id: &SetId,
        page: u32,
        pagesize: u32,
    ) -> Result<SplHistory> {
        validate_pagination(page, pagesize)?;
        let mut params = QueryParams::new();
        params.push("page", page).push("pagesize", pagesize);

        let endpoint = format!("spls/{set_id}/history.json");
        let envelope: DetailEnvelope<RawHistoryData> = self.get_json(&endpoint, &params).await?;
        let pagination = check_metadata(envelope.metadata)?;

        Ok(SplHistory {
            spl: envelope.data.spl,
            versions: envelope.data.history,
            pagination,
        })
    }

    /// NDCs listed on an SPL
    #[instrument(skip(self), fields(set_id = %set_id))]
    pub async fn get_spl_ndcs(&self, set_id: &SetId) -> Result<SplNdcs> {
        let endpoint = format!("spls/{set_id}/ndcs.json");
        let envelope: DetailEnvelope<RawNdcsData> =
            self.get_json(&endpoint, &QueryParams::new()).await?;
        check_metadata(envelope.metadata)?;

        Ok(SplNdcs {
            spl: envelope.data.spl,
            ndcs: envelope
                .data
                .ndcs
                .into_iter()
                .filter_map(|entry| entry.ndc)
                .collect(),
        })
    }

    /// Products, ingredients and package NDCs of an SPL
    #[instrument(skip(self), fields(set_id = %set_id))]
    pub async fn get_spl_packaging(&self, set_id: &SetId) -> Result<SplPackaging> {
        let endpoint = format!("spls/{set_id}/packaging.json");
        let envelope: DetailEnvelope<RawPackagingData> =
            self.get_json(&endpoint, &QueryParams::new()).await?;
        check_metadata(envelope.metadata)?;

        Ok(SplPackaging {
            spl: envelope.data.spl,
            products: envelope.data.products,
        })
    }
}
