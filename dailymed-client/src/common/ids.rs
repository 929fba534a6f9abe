//! Validated identifier types for DailyMed labels and products
//!
//! SET IDs identify an SPL document lineage and are what the detail
//! endpoints are keyed on. NDCs (National Drug Codes) identify products and
//! packages and are accepted by the search endpoint.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{DailyMedError, Result};

static SET_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
        .expect("SET ID pattern is valid")
});

// Labeler-product in the 4-4, 5-3 or 5-4 layout with an optional package
// segment, or the bare 10/11 digit form.
static NDC_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^((\d{4}-\d{4}|\d{5}-\d{3,4})(-\d{1,2})?|\d{10,11})$")
        .expect("NDC pattern is valid")
});

/// A validated SPL SET ID (a UUID, stored lowercase)
///
/// # Examples
///
/// ```
/// use dailymed_client::SetId;
///
/// let set_id = SetId::parse(" 5A2E8C1B-0F3D-4E6A-9B7C-1D2E3F4A5B6C ").unwrap();
/// assert_eq!(set_id.as_str(), "5a2e8c1b-0f3d-4e6a-9b7c-1d2e3f4a5b6c");
///
/// assert!(SetId::parse("").is_err());
/// assert!(SetId::parse("not-a-set-id").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SetId(String);

impl SetId {
    /// Parse a SET ID, trimming surrounding whitespace
    ///
    /// # Errors
    ///
    /// Returns `DailyMedError::InvalidQuery` if the value is not a UUID.
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if !SET_ID_PATTERN.is_match(trimmed) {
            return Err(DailyMedError::InvalidQuery(format!(
                "Invalid SET ID: '{s}'"
            )));
        }
        Ok(Self(trimmed.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SetId {
    type Err = DailyMedError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<str> for SetId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A validated National Drug Code (product or package level)
///
/// # Examples
///
/// ```
/// use dailymed_client::Ndc;
///
/// assert!(Ndc::parse("0573-0164").is_ok());
/// assert!(Ndc::parse("0573-0164-40").is_ok());
/// assert!(Ndc::parse("ABC-123").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ndc(String);

impl Ndc {
    /// Parse an NDC, trimming surrounding whitespace
    ///
    /// # Errors
    ///
    /// Returns `DailyMedError::InvalidQuery` for anything that is not an NDC.
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if !NDC_PATTERN.is_match(trimmed) {
            return Err(DailyMedError::InvalidQuery(format!("Invalid NDC: '{s}'")));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this code includes the package segment
    pub fn is_package_code(&self) -> bool {
        self.0.matches('-').count() == 2 || self.0.len() == 11
    }
}

impl fmt::Display for Ndc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Ndc {
    type Err = DailyMedError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
