//! Query builders for the DailyMed listing endpoints
//!
//! Every builder carries explicit pagination. Nothing here ever fetches more
//! than the single page the caller asked for.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::common::{Ndc, SetId};
use crate::error::{DailyMedError, Result};
use crate::transport::QueryParams;

/// Largest page size accepted by DailyMed
pub const MAX_PAGE_SIZE: u32 = 100;

/// Page size used when the caller does not pick one
pub const DEFAULT_PAGE_SIZE: u32 = 10;

static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern is valid"));

/// Check `page >= 1` and `1 <= pagesize <= 100`
pub fn validate_pagination(page: u32, pagesize: u32) -> Result<()> {
    if page == 0 {
        return Err(DailyMedError::InvalidQuery(
            "page must be 1 or greater".to_string(),
        ));
    }
    if pagesize == 0 || pagesize > MAX_PAGE_SIZE {
        return Err(DailyMedError::InvalidQuery(format!(
            "pagesize must be between 1 and {MAX_PAGE_SIZE}, got {pagesize}"
        )));
    }
    Ok(())
}

fn paging_params(page: u32, pagesize: u32) -> QueryParams {
    let mut params = QueryParams::new();
    params.push("page", page).push("pagesize", pagesize);
    params
}

/// Comparison applied to `published_date`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateComparison {
    Lt,
    Lte,
    Gt,
    Gte,
    Eq,
}

impl DateComparison {
    pub fn as_api_param(&self) -> &'static str {
        match self {
            DateComparison::Lt => "lt",
            DateComparison::Lte => "lte",
            DateComparison::Gt => "gt",
            DateComparison::Gte => "gte",
            DateComparison::Eq => "eq",
        }
    }
}

impl fmt::Display for DateComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_api_param())
    }
}

impl FromStr for DateComparison {
    type Err = DailyMedError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lt" => Ok(DateComparison::Lt),
            "lte" => Ok(DateComparison::Lte),
            "gt" => Ok(DateComparison::Gt),
            "gte" => Ok(DateComparison::Gte),
            "eq" => Ok(DateComparison::Eq),
            other => Err(DailyMedError::InvalidQuery(format!(
                "Unknown date comparison '{other}' (expected lt, lte, gt, gte or eq)"
            ))),
        }
    }
}

/// Drug name flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameType {
    Generic,
    Brand,
}

impl NameType {
    pub fn as_api_param(&self) -> &'static str {
        match self {
            NameType::Generic => "g",
            NameType::Brand => "b",
        }
    }
}

impl fmt::Display for NameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_api_param())
    }
}

/// Search parameters for the `spls` endpoint
///
/// # Example
///
/// ```
/// use dailymed_client::SplQuery;
///
/// let query = SplQuery::new()
///     .drug_name("ibuprofen")
///     .labeler("Acme Pharma")
///     .page(2)
///     .pagesize(25);
///
/// assert!(query.validate().is_ok());
/// assert_eq!(query.get_page(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplQuery {
    page: u32,
    pagesize: u32,
    application_number: Option<String>,
    boxed_warning: Option<bool>,
    dea_schedule_code: Option<String>,
    doctype: Option<String>,
    drug_class_code: Option<String>,
    drug_class_coding_system: Option<String>,
    drug_name: Option<String>,
    name_type: Option<NameType>,
    labeler: Option<String>,
    manufacturer: Option<String>,
    marketing_category_code: Option<String>,
    ndc: Option<String>,
    published_date: Option<String>,
    published_date_comparison: Option<DateComparison>,
    rxcui: Option<String>,
    setid: Option<String>,
    unii_code: Option<String>,
}

impl Default for SplQuery {
    fn default() -> Self {
        Self {
            page: 1,
            pagesize: DEFAULT_PAGE_SIZE,
            application_number: None,
            boxed_warning: None,
            dea_schedule_code: None,
            doctype: None,
            drug_class_code: None,
            drug_class_coding_system: None,
            drug_name: None,
            name_type: None,
            labeler: None,
            manufacturer: None,
            marketing_category_code: None,
            ndc: None,
            published_date: None,
            published_date_comparison: None,
            rxcui: None,
            setid: None,
            unii_code: None,
        }
    }
}

impl SplQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn pagesize(mut self, pagesize: u32) -> Self {
        self.pagesize = pagesize;
        self
    }

    /// Filter by NDA/ANDA/BLA application number
    pub fn application_number<S: Into<String>>(mut self, value: S) -> Self {
        self.application_number = Some(value.into());
        self
    }

    pub fn boxed_warning(mut self, value: bool) -> Self {
        self.boxed_warning = Some(value);
        self
    }

    /// DEA schedule code, e.g. `C48676` for CIII
    pub fn dea_schedule_code<S: Into<String>>(mut self, value: S) -> Self {
        self.dea_schedule_code = Some(value.into());
        self
    }

    /// Document type code, e.g. `C78841` for HUMAN PRESCRIPTION DRUG LABEL
    pub fn doctype<S: Into<String>>(mut self, value: S) -> Self {
        self.doctype = Some(value.into());
        self
    }

    pub fn drug_class_code<S: Into<String>>(mut self, value: S) -> Self {
        self.drug_class_code = Some(value.into());
        self
    }

    pub fn drug_class_coding_system<S: Into<String>>(mut self, value: S) -> Self {
        self.drug_class_coding_system = Some(value.into());
        self
    }

    pub fn drug_name<S: Into<String>>(mut self, value: S) -> Self {
        self.drug_name = Some(value.into());
        self
    }

    pub fn name_type(mut self, value: NameType) -> Self {
        self.name_type = Some(value);
        self
    }

    pub fn labeler<S: Into<String>>(mut self, value: S) -> Self {
        self.labeler = Some(value.into());
        self
    }

    pub fn manufacturer<S: Into<String>>(mut self, value: S) -> Self {
        self.manufacturer = Some(value.into());
        self
    }

    /// Marketing category code, e.g. `C73594` for NDA
    pub fn marketing_category_code<S: Into<String>>(mut self, value: S) -> Self {
        self.marketing_category_code = Some(value.into());
        self
    }

    pub fn ndc<S: Into<String>>(mut self, value: S) -> Self {
        self.ndc = Some(value.into());
        self
    }

    /// Published date in `YYYY-MM-DD` form
    pub fn published_date<S: Into<String>>(mut self, value: S) -> Self {
        self.published_date = Some(value.into());
        self
    }

    pub fn published_date_comparison(mut self, value: DateComparison) -> Self {
        self.published_date_comparison = Some(value);
        self
    }

    pub fn rxcui<S: Into<String>>(mut self, value: S) -> Self {
        self.rxcui = Some(value.into());
        self
    }

    pub fn setid<S: Into<String>>(mut self, value: S) -> Self {
        self.setid = Some(value.into());
        self
    }

    pub fn unii_code<S: Into<String>>(mut self, value: S) -> Self {
        self.unii_code = Some(value.into());
        self
    }

    pub fn get_page(&self) -> u32 {
        self.page
    }

    pub fn get_pagesize(&self) -> u32 {
        self.pagesize
    }

    pub fn get_drug_name(&self) -> Option<&str> {
        self.drug_name.as_deref()
    }

    pub fn get_ndc(&self) -> Option<&str> {
        self.ndc.as_deref()
    }

    /// Check pagination and identifier syntax
    pub fn validate(&self) -> Result<()> {
        validate_pagination(self.page, self.pagesize)?;

        if let Some(ndc) = &self.ndc {
            Ndc::parse(ndc)?;
        }
        if let Some(setid) = &self.setid {
            SetId::parse(setid)?;
        }
        if let Some(date) = &self.published_date {
            if !DATE_PATTERN.is_match(date.trim()) {
                return Err(DailyMedError::InvalidQuery(format!(
                    "published_date must be YYYY-MM-DD, got '{date}'"
                )));
            }
        }
        if self.published_date_comparison.is_some() && self.published_date.is_none() {
            return Err(DailyMedError::InvalidQuery(
                "published_date_comparison requires published_date".to_string(),
            ));
        }
        Ok(())
    }

    /// Query parameters in the order DailyMed documents them
    pub fn to_params(&self) -> QueryParams {
        let mut params = paging_params(self.page, self.pagesize);
        params
            .push_opt("application_number", self.application_number.as_deref())
            .push_opt("boxed_warning", self.boxed_warning)
            .push_opt("dea_schedule_code", self.dea_schedule_code.as_deref())
            .push_opt("doctype", self.doctype.as_deref())
            .push_opt("drug_class_code", self.drug_class_code.as_deref())
            .push_opt(
                "drug_class_coding_system",
                self.drug_class_coding_system.as_deref(),
            )
            .push_opt("drug_name", self.drug_name.as_deref())
            .push_opt("name_type", self.name_type.map(|n| n.as_api_param()))
            .push_opt("labeler", self.labeler.as_deref())
            .push_opt("manufacturer", self.manufacturer.as_deref())
            .push_opt(
                "marketing_category_code",
                self.marketing_category_code.as_deref(),
            )
            .push_opt("ndc", self.ndc.as_deref().map(str::trim))
            .push_opt("published_date", self.published_date.as_deref().map(str::trim))
            .push_opt(
                "published_date_comparison",
                self.published_date_comparison.map(|c| c.as_api_param()),
            )
            .push_opt("rxcui", self.rxcui.as_deref())
            .push_opt("setid", self.setid.as_deref().map(str::trim))
            .push_opt("unii_code", self.unii_code.as_deref());
        params
    }
}

/// Parameters for the `drugnames` endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrugNameQuery {
    pub page: u32,
    pub pagesize: u32,
    pub manufacturer: Option<String>,
    pub name_type: Option<NameType>,
}

impl Default for DrugNameQuery {
    fn default() -> Self {
        Self {
            page: 1,
            pagesize: DEFAULT_PAGE_SIZE,
            manufacturer: None,
            name_type: None,
        }
    }
}

impl DrugNameQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn pagesize(mut self, pagesize: u32) -> Self {
        self.pagesize = pagesize;
        self
    }

    pub fn manufacturer<S: Into<String>>(mut self, value: S) -> Self {
        self.manufacturer = Some(value.into());
        self
    }

    pub fn name_type(mut self, value: NameType) -> Self {
        self.name_type = Some(value);
        self
    }

    pub fn to_params(&self) -> QueryParams {
        let mut params = paging_params(self.page, self.pagesize);
        params
            .push_opt("manufacturer", self.manufacturer.as_deref())
            .push_opt("name_type", self.name_type.map(|n| n.as_api_param()));
        params
    }
}

/// Parameters for the `ndcs` endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NdcQuery {
    pub page: u32,
    pub pagesize: u32,
    pub application_number: Option<String>,
    pub labeler: Option<String>,
    pub marketing_category_code: Option<String>,
    pub setid: Option<String>,
}

impl Default for NdcQuery {
    fn default() -> Self {
        Self {
            page: 1,
            pagesize: DEFAULT_PAGE_SIZE,
            application_number: None,
            labeler: None,
            marketing_category_code: None,
            setid: None,
        }
    }
}

impl NdcQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn pagesize(mut self, pagesize: u32) -> Self {
        self.pagesize = pagesize;
        self
    }

    pub fn application_number<S: Into<String>>(mut self, value: S) -> Self {
        self.application_number = Some(value.into());
        self
    }

    pub fn labeler<S: Into<String>>(mut self, value: S) -> Self {
        self.labeler = Some(value.into());
        self
    }

    pub fn marketing_category_code<S: Into<String>>(mut self, value: S) -> Self {
        self.marketing_category_code = Some(value.into());
        self
    }

    pub fn setid<S: Into<String>>(mut self, value: S) -> Self {
        self.setid = Some(value.into());
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_pagination(self.page, self.pagesize)?;
        if let Some(setid) = &self.setid {
            SetId::parse(setid)?;
        }
        Ok(())
    }

    pub fn to_params(&self) -> QueryParams {
        let mut params = paging_params(self.page, self.pagesize);
        params
            .push_opt("application_number", self.application_number.as_deref())
            .push_opt("labeler", self.labeler.as_deref())
            .push_opt(
                "marketing_category_code",
                self.marketing_category_code.as_deref(),
            )
            .push_opt("setid", self.setid.as_deref().map(str::trim));
        params
    }
}

/// Parameters for the `drugclasses` endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrugClassQuery {
    pub page: u32,
    pub pagesize: u32,
    pub drug_class_code: Option<String>,
    pub drug_class_coding_system: Option<String>,
    /// Class code type, e.g. `epc`, `moa`, `pe`, `cs`
    pub class_code_type: Option<String>,
    pub class_name: Option<String>,
    pub unii_code: Option<String>,
}

impl Default for DrugClassQuery {
    fn default() -> Self {
        Self {
            page: 1,
            pagesize: DEFAULT_PAGE_SIZE,
            drug_class_code: None,
            drug_class_coding_system: None,
            class_code_type: None,
            class_name: None,
            unii_code: None,
        }
    }
}

impl DrugClassQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn pagesize(mut self, pagesize: u32) -> Self {
        self.pagesize = pagesize;
        self
    }

    pub fn drug_class_code<S: Into<String>>(mut self, value: S) -> Self {
        self.drug_class_code = Some(value.into());
        self
    }

    pub fn drug_class_coding_system<S: Into<String>>(mut self, value: S) -> Self {
        self.drug_class_coding_system = Some(value.into());
        self
    }

    pub fn class_code_type<S: Into<String>>(mut self, value: S) -> Self {
        self.class_code_type = Some(value.into());
        self
    }

    pub fn class_name<S: Into<String>>(mut self, value: S) -> Self {
        self.class_name = Some(value.into());
        self
    }

    pub fn unii_code<S: Into<String>>(mut self, value: S) -> Self {
        self.unii_code = Some(value.into());
        self
    }

    pub fn to_params(&self) -> QueryParams {
        let mut params = paging_params(self.page, self.pagesize);
        params
            .push_opt("drug_class_code", self.drug_class_code.as_deref())
            .push_opt(
                "drug_class_coding_system",
                self.drug_class_coding_system.as_deref(),
            )
            .push_opt("class_code_type", self.class_code_type.as_deref())
            .push_opt("class_name", self.class_name.as_deref())
            .push_opt("unii_code", self.unii_code.as_deref());
        params
    }
}

/// Parameters for the `uniis` endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniiQuery {
    pub page: u32,
    pub pagesize: u32,
    pub active_moiety: Option<String>,
    pub drug_class_code: Option<String>,
    pub drug_class_coding_system: Option<String>,
    pub rxcui: Option<String>,
    pub unii_code: Option<String>,
}

impl Default for UniiQuery {
    fn default() -> Self {
        Self {
            page: 1,
            pagesize: DEFAULT_PAGE_SIZE,
            active_moiety: None,
            drug_class_code: None,
            drug_class_coding_system: None,
            rxcui: None,
            unii_code: None,
        }
    }
}

impl UniiQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn pagesize(mut self, pagesize: u32) -> Self {
        self.pagesize = pagesize;
        self
    }

    pub fn active_moiety<S: Into<String>>(mut self, value: S) -> Self {
        self.active_moiety = Some(value.into());
        self
    }

    pub fn drug_class_code<S: Into<String>>(mut self, value: S) -> Self {
        self.drug_class_code = Some(value.into());
        self
    }

    pub fn drug_class_coding_system<S: Into<String>>(mut self, value: S) -> Self {
        self.drug_class_coding_system = Some(value.into());
        self
    }

    pub fn rxcui<S: Into<String>>(mut self, value: S) -> Self {
        self.rxcui = Some(value.into());
        self
    }

    pub fn unii_code<S: Into<String>>(mut self, value: S) -> Self {
        self.unii_code = Some(value.into());
        self
    }

    pub fn to_params(&self) -> QueryParams {
        let mut params = paging_params(self.page, self.pagesize);
        params
            .push_opt("active_moiety", self.active_moiety.as_deref())
            .push_opt("drug_class_code", self.drug_class_code.as_deref())
            .push_opt(
                "drug_class_coding_system",
                self.drug_class_coding_system.as_deref(),
            )
            .push_opt("rxcui", self.rxcui.as_deref())
            .push_opt("unii_code", self.unii_code.as_deref());
        params
    }
}

/// Parameters for the RxCUI terminology lookup
///
/// # Example
///
/// ```
/// use dailymed_client::RxcuiQuery;
///
/// let query = RxcuiQuery::new().rxstring("aspirin").rxtty("IN");
/// let params = query.to_params();
/// assert_eq!(params.get("rxstring"), Some("aspirin"));
/// assert_eq!(params.get("rxtty"), Some("IN"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RxcuiQuery {
    pub page: u32,
    pub pagesize: u32,
    pub rxcui: Option<String>,
    /// Display string to look up, e.g. `aspirin`
    pub rxstring: Option<String>,
    /// RxNorm term type, e.g. `IN` for ingredient or `SCD`
    pub rxtty: Option<String>,
}

impl Default for RxcuiQuery {
    fn default() -> Self {
        Self {
            page: 1,
            pagesize: DEFAULT_PAGE_SIZE,
            rxcui: None,
            rxstring: None,
            rxtty: None,
        }
    }
}

impl RxcuiQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn pagesize(mut self, pagesize: u32) -> Self {
        self.pagesize = pagesize;
        self
    }

    pub fn rxcui<S: Into<String>>(mut self, value: S) -> Self {
        self.rxcui = Some(value.into());
        self
    }

    pub fn rxstring<S: Into<String>>(mut self, value: S) -> Self {
        self.rxstring = Some(value.into());
        self
    }

    pub fn rxtty<S: Into<String>>(mut self, value: S) -> Self {
        self.rxtty = Some(value.into());
        self
    }

    pub fn to_params(&self) -> QueryParams {
        let mut params = paging_params(self.page, self.pagesize);
        params
            .push_opt("rxcui", self.rxcui.as_deref())
            .push_opt("rxstring", self.rxstring.as_deref())
            .push_opt("rxtty", self.rxtty.as_deref());
        params
    }
}
