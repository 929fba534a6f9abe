use serde::{Deserialize, Serialize};

use crate::common::SetId;
use crate::common::deserializers::{lenient_string, lenient_u64};

/// Paging metadata returned alongside every DailyMed listing
///
/// DailyMed is inconsistent about types here (numbers, numeric strings and the
/// literal `"null"` all occur), so every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub total_elements: Option<u64>,
    pub total_pages: Option<u64>,
    pub current_page: Option<u64>,
    pub elements_per_page: Option<u64>,
    pub next_page_url: Option<String>,
    pub previous_page_url: Option<String>,
}

impl Pagination {
    /// Whether DailyMed advertises a following page
    pub fn has_next_page(&self) -> bool {
        if self.next_page_url.is_some() {
            return true;
        }
        matches!(
            (self.current_page, self.total_pages),
            (Some(current), Some(total)) if current < total
        )
    }
}

/// One page of a DailyMed listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A single `spls` search row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplSummary {
    pub set_id: SetId,
    pub title: Option<String>,
    pub spl_version: Option<u64>,
    pub published_date: Option<String>,
}

impl SplSummary {
    /// Title if present, otherwise the SET ID
    pub fn display_name(&self) -> &str {
        self.title.as_deref().unwrap_or(self.set_id.as_str())
    }
}

/// Decoded `spls` search page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplSearchPage {
    pub items: Vec<SplSummary>,
    pub pagination: Pagination,
    /// Rows skipped because they carried no usable SET ID
    pub malformed_rows: usize,
}

impl SplSearchPage {
    /// SET IDs of the returned rows, in order
    pub fn set_ids(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|summary| summary.set_id.as_str())
    }
}

/// A drug name from the `drugnames` listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrugName {
    #[serde(default, deserialize_with = "lenient_string")]
    pub drug_name: Option<String>,
    /// `G` for generic, `B` for brand
    #[serde(default, deserialize_with = "lenient_string")]
    pub name_type: Option<String>,
}

/// An entry from the `ndcs` listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NdcEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub ndc: Option<String>,
}

/// A pharmacologic class from the `drugclasses` listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrugClass {
    #[serde(default, deserialize_with = "lenient_string")]
    pub code: Option<String>,
    #[serde(
        default,
        rename(deserialize = "codingSystem"),
        alias = "coding_system",
        deserialize_with = "lenient_string"
    )]
    pub coding_system: Option<String>,
    #[serde(
        default,
        rename(deserialize = "type"),
        alias = "class_type",
        deserialize_with = "lenient_string"
    )]
    pub class_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
}

/// An ingredient identifier from the `uniis` listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unii {
    #[serde(default, deserialize_with = "lenient_string")]
    pub unii: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub active_moiety: Option<String>,
}

/// A concept returned by the RxCUI terminology lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RxConcept {
    #[serde(default, deserialize_with = "lenient_string")]
    pub rxcui: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub rxstring: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub rxtty: Option<String>,
}

/// Identification block shared by the per-SPL detail endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplReference {
    #[serde(default, rename(deserialize = "setid"), deserialize_with = "lenient_string")]
    pub set_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub spl_version: Option<u64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub published_date: Option<String>,
}

/// One historical version of an SPL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplVersion {
    #[serde(default, deserialize_with = "lenient_u64")]
    pub spl_version: Option<u64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub published_date: Option<String>,
}

/// Version history of an SPL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplHistory {
    pub spl: SplReference,
    pub versions: Vec<SplVersion>,
    pub pagination: Pagination,
}

/// NDCs attached to an SPL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplNdcs {
    pub spl: SplReference,
    pub ndcs: Vec<String>,
}

/// An active ingredient as listed on the packaging endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackagedIngredient {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub strength: Option<String>,
}

/// One package configuration of a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDescription {
    #[serde(default, deserialize_with = "lenient_string")]
    pub ndc: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
}

/// A product with its ingredients and packages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackagedProduct {
    #[serde(default, deserialize_with = "lenient_string")]
    pub product_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub product_name_generic: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub product_code: Option<String>,
    #[serde(default)]
    pub active_ingredients: Vec<PackagedIngredient>,
    #[serde(default)]
    pub packaging: Vec<PackageDescription>,
}

/// Packaging information for an SPL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplPackaging {
    pub spl: SplReference,
    pub products: Vec<PackagedProduct>,
}
