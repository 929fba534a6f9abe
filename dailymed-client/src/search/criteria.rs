use serde::Serialize;

use crate::dailymed::SplQuery;
use crate::error::Result;
use crate::search::filter::FilterCriteria;

/// Remote query plus client-side predicate set for an advanced search
///
/// # Example
///
/// ```
/// use dailymed_client::{FilterCriteria, SearchCriteria};
///
/// let criteria = SearchCriteria::by_drug_name(
///     "ibuprofen",
///     FilterCriteria::builder().route("oral").build(),
/// )
/// .with_page(2, 25);
///
/// assert_eq!(criteria.query.get_page(), 2);
/// assert!(criteria.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchCriteria {
    pub query: SplQuery,
    pub filters: FilterCriteria,
}

impl SearchCriteria {
    pub fn new(query: SplQuery, filters: FilterCriteria) -> Self {
        Self { query, filters }
    }

    /// Search by drug name
    pub fn by_drug_name<S: Into<String>>(name: S, filters: FilterCriteria) -> Self {
        Self::new(SplQuery::new().drug_name(name), filters)
    }

    /// Search by National Drug Code
    pub fn by_ndc<S: Into<String>>(ndc: S, filters: FilterCriteria) -> Self {
        Self::new(SplQuery::new().ndc(ndc), filters)
    }

    pub fn with_page(mut self, page: u32, pagesize: u32) -> Self {
        self.query = self.query.page(page).pagesize(pagesize);
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.query.validate()
    }
}
