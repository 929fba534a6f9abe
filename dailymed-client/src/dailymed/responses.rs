//! Internal wire shapes for DailyMed payloads
//!
//! Everything the remote may omit is optional here. Conversion into the public
//! models happens in the client once the envelope has been checked.

use serde::Deserialize;

use crate::common::SetId;
use crate::common::deserializers::{lenient_string, lenient_u64};
use crate::dailymed::models::{
    NdcEntry, PackagedProduct, Pagination, SplReference, SplSummary, SplVersion,
};

/// `metadata` block shared by every DailyMed response
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawMetadata {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub total_elements: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub total_pages: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub current_page: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub elements_per_page: Option<u64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub next_page_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub previous_page_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub error_message: Option<String>,
}

impl RawMetadata {
    pub fn into_pagination(self) -> Pagination {
        Pagination {
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            current_page: self.current_page,
            elements_per_page: self.elements_per_page,
            next_page_url: self.next_page_url,
            previous_page_url: self.previous_page_url,
        }
    }
}

/// `{ metadata, data: [...] }` listing envelope
#[derive(Debug, Deserialize)]
pub(crate) struct ListEnvelope<T> {
    #[serde(default)]
    pub metadata: Option<RawMetadata>,
    pub data: Vec<T>,
}

/// `{ metadata, data: {...} }` per-SPL envelope
#[derive(Debug, Deserialize)]
pub(crate) struct DetailEnvelope<T> {
    #[serde(default)]
    pub metadata: Option<RawMetadata>,
    pub data: T,
}

/// One `spls` row before validation
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawSplRow {
    #[serde(default, deserialize_with = "lenient_string")]
    pub setid: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub spl_version: Option<u64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub published_date: Option<String>,
}

impl RawSplRow {
    /// Validate the row, reporting why it cannot become a summary
    pub fn into_summary(self) -> Result<SplSummary, String> {
        let raw_id = self.setid.ok_or_else(|| "row has no setid".to_string())?;
        let set_id = SetId::parse(&raw_id).map_err(|err| err.to_string())?;
        Ok(SplSummary {
            set_id,
            title: self.title,
            spl_version: self.spl_version,
            published_date: self.published_date,
        })
    }
}

/// `spls.xml` document
#[derive(Debug, Deserialize)]
#[serde(rename = "spls")]
pub(crate) struct SplListXml {
    #[serde(default)]
    pub metadata: Option<RawMetadata>,
    #[serde(rename = "spl", default)]
    pub rows: Vec<RawSplRow>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawHistoryData {
    #[serde(default)]
    pub spl: SplReference,
    #[serde(default)]
    pub history: Vec<SplVersion>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawNdcsData {
    #[serde(default)]
    pub spl: SplReference,
    #[serde(default)]
    pub ndcs: Vec<NdcEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawPackagingData {
    #[serde(default)]
    pub spl: SplReference,
    #[serde(default)]
    pub products: Vec<PackagedProduct>,
}
