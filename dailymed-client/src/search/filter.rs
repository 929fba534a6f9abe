//! Client-side post-filter engine
//!
//! Every predicate is optional; an absent (or empty) predicate always passes.
//! All present predicates must pass. Values are normalized when the criteria
//! are built and documents are normalized when parsed, so every check here
//! is plain set membership.
//!
//! `only_active` is evaluated independently of `include_active` and
//! `exclude_active`. Combining them in contradictory ways simply yields no
//! matches; resolving such conflicts is up to the caller.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::normalize_terms;
use crate::spl::SplDocument;

/// A single filter predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FilterAxis {
    Route,
    Form,
    IncludeActive,
    ExcludeActive,
    OnlyActive,
    IncludeInactive,
    ExcludeInactive,
}

impl FilterAxis {
    /// All axes in evaluation order
    pub const ALL: [FilterAxis; 7] = [
        FilterAxis::Route,
        FilterAxis::Form,
        FilterAxis::IncludeActive,
        FilterAxis::ExcludeActive,
        FilterAxis::OnlyActive,
        FilterAxis::IncludeInactive,
        FilterAxis::ExcludeInactive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterAxis::Route => "route",
            FilterAxis::Form => "form",
            FilterAxis::IncludeActive => "include-active",
            FilterAxis::ExcludeActive => "exclude-active",
            FilterAxis::OnlyActive => "only-active",
            FilterAxis::IncludeInactive => "include-inactive",
            FilterAxis::ExcludeInactive => "exclude-inactive",
        }
    }
}

impl fmt::Display for FilterAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The post-filter predicate set
///
/// Built through [`FilterCriteria::builder`], which normalizes every value.
///
/// # Example
///
/// ```
/// use dailymed_client::FilterCriteria;
///
/// let filters = FilterCriteria::builder()
///     .route(" Oral ")
///     .forms(["TABLET", "capsule"])
///     .exclude_active(["Acetaminophen"])
///     .build();
///
/// assert!(filters.routes().contains("oral"));
/// assert!(filters.exclude_active().contains("acetaminophen"));
/// assert!(filters.only_active().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterCriteria {
    routes: BTreeSet<String>,
    forms: BTreeSet<String>,
    include_active: BTreeSet<String>,
    exclude_active: BTreeSet<String>,
    only_active: BTreeSet<String>,
    include_inactive: BTreeSet<String>,
    exclude_inactive: BTreeSet<String>,
}

impl FilterCriteria {
    /// Criteria with no predicates; everything matches
    pub fn none() -> Self {
        Self::default()
    }

    pub fn builder() -> FilterCriteriaBuilder {
        FilterCriteriaBuilder::default()
    }

    pub fn routes(&self) -> &BTreeSet<String> {
        &self.routes
    }

    pub fn forms(&self) -> &BTreeSet<String> {
        &self.forms
    }

    pub fn include_active(&self) -> &BTreeSet<String> {
        &self.include_active
    }

    pub fn exclude_active(&self) -> &BTreeSet<String> {
        &self.exclude_active
    }

    pub fn only_active(&self) -> &BTreeSet<String> {
        &self.only_active
    }

    pub fn include_inactive(&self) -> &BTreeSet<String> {
        &self.include_inactive
    }

    pub fn exclude_inactive(&self) -> &BTreeSet<String> {
        &self.exclude_inactive
    }

    /// Whether the predicate for `axis` is present
    pub fn has(&self, axis: FilterAxis) -> bool {
        !self.values(axis).is_empty()
    }

    /// Whether no predicate is present at all
    pub fn is_empty(&self) -> bool {
        FilterAxis::ALL.iter().all(|axis| !self.has(*axis))
    }

    fn values(&self, axis: FilterAxis) -> &BTreeSet<String> {
        match axis {
            FilterAxis::Route => &self.routes,
            FilterAxis::Form => &self.forms,
            FilterAxis::IncludeActive => &self.include_active,
            FilterAxis::ExcludeActive => &self.exclude_active,
            FilterAxis::OnlyActive => &self.only_active,
            FilterAxis::IncludeInactive => &self.include_inactive,
            FilterAxis::ExcludeInactive => &self.exclude_inactive,
        }
    }
}

/// Builder for [`FilterCriteria`]
#[derive(Debug, Clone, Default)]
pub struct FilterCriteriaBuilder {
    criteria: FilterCriteria,
}

impl FilterCriteriaBuilder {
    pub fn route<S: AsRef<str>>(self, route: S) -> Self {
        self.routes([route])
    }

    pub fn routes<I, S>(mut self, routes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.criteria.routes.extend(normalize_terms(routes));
        self
    }

    pub fn form<S: AsRef<str>>(self, form: S) -> Self {
        self.forms([form])
    }

    pub fn forms<I, S>(mut self, forms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.criteria.forms.extend(normalize_terms(forms));
        self
    }

    /// Every listed name must be an active ingredient
    pub fn include_active<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.criteria.include_active.extend(normalize_terms(names));
        self
    }

    /// None of the listed names may be an active ingredient
    pub fn exclude_active<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.criteria.exclude_active.extend(normalize_terms(names));
        self
    }

    /// The active ingredient set must equal the listed names exactly
    pub fn only_active<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.criteria.only_active.extend(normalize_terms(names));
        self
    }

    pub fn include_inactive<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.criteria.include_inactive.extend(normalize_terms(names));
        self
    }

    pub fn exclude_inactive<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.criteria.exclude_inactive.extend(normalize_terms(names));
        self
    }

    pub fn build(self) -> FilterCriteria {
        self.criteria
    }
}

/// Per-axis decision for one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterResult {
    /// Present predicates that failed, in evaluation order
    pub failed_axes: Vec<FilterAxis>,
    /// Present predicates that passed, in evaluation order
    pub passed_axes: Vec<FilterAxis>,
}

impl FilterResult {
    pub fn passed(&self) -> bool {
        self.failed_axes.is_empty()
    }

    /// The first failing axis
    pub fn reason(&self) -> Option<FilterAxis> {
        self.failed_axes.first().copied()
    }
}

/// Evaluate every present predicate against a parsed document
pub fn evaluate(doc: &SplDocument, criteria: &FilterCriteria) -> FilterResult {
    let mut result = FilterResult::default();
    if criteria.is_empty() {
        return result;
    }

    let routes = doc.routes();
    let forms = doc.forms();
    let active = doc.active_ingredient_names();
    let inactive = doc.inactive_ingredient_names();

    for axis in FilterAxis::ALL {
        let wanted = criteria.values(axis);
        if wanted.is_empty() {
            continue;
        }

        let passed = match axis {
            FilterAxis::Route => wanted.iter().any(|r| routes.contains(r.as_str())),
            FilterAxis::Form => wanted.iter().any(|f| forms.contains(f.as_str())),
            FilterAxis::IncludeActive => wanted.is_subset(&active),
            FilterAxis::ExcludeActive => wanted.is_disjoint(&active),
            FilterAxis::OnlyActive => *wanted == active,
            FilterAxis::IncludeInactive => wanted.is_subset(&inactive),
            FilterAxis::ExcludeInactive => wanted.is_disjoint(&inactive),
        };

        if passed {
            result.passed_axes.push(axis);
        } else {
            result.failed_axes.push(axis);
        }
    }

    result
}

/// Whether a document satisfies every present predicate
pub fn matches(doc: &SplDocument, criteria: &FilterCriteria) -> bool {
    evaluate(doc, criteria).passed()
}
