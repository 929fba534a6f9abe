//! Candidates and per-candidate outcomes

use serde::Serialize;
use tracing::{debug, warn};

use crate::common::SetId;
use crate::dailymed::{DailyMedClient, SplSummary};
use crate::search::filter::{FilterAxis, FilterCriteria, FilterResult, evaluate};
use crate::spl::{RouteForm, SplDocument};

/// Detail document lifecycle of a candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    Unfetched,
    Fetched(SplDocument),
    FetchFailed(String),
}

/// One remote search result on its way through the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub set_id: SetId,
    pub display_name: String,
    detail: DetailState,
}

impl Candidate {
    pub fn new(set_id: SetId, display_name: impl Into<String>) -> Self {
        Self {
            set_id,
            display_name: display_name.into(),
            detail: DetailState::Unfetched,
        }
    }

    pub fn from_summary(summary: &SplSummary) -> Self {
        Self::new(summary.set_id.clone(), summary.display_name())
    }

    pub fn detail(&self) -> &DetailState {
        &self.detail
    }

    /// Fetch and parse the detail document
    ///
    /// Only an `Unfetched` candidate issues a request; later calls return the
    /// recorded state. Any error (transport or parse) becomes `FetchFailed`.
    pub async fn fetch(&mut self, client: &DailyMedClient) -> &DetailState {
        if matches!(self.detail, DetailState::Unfetched) {
            self.detail = match client.fetch_spl_document(&self.set_id).await {
                Ok(doc) => DetailState::Fetched(doc),
                Err(err) => {
                    warn!(set_id = %self.set_id, error = %err, "Failed to fetch SPL document");
                    DetailState::FetchFailed(err.to_string())
                }
            };
        }
        &self.detail
    }

    /// Evaluate the filters, if the document is available
    pub fn evaluate(&self, filters: &FilterCriteria) -> Option<FilterResult> {
        match &self.detail {
            DetailState::Fetched(doc) => Some(evaluate(doc, filters)),
            _ => None,
        }
    }

    /// Record the final decision for this candidate
    pub fn into_record(self, filters: &FilterCriteria) -> OutcomeRecord {
        let outcome = match &self.detail {
            DetailState::Fetched(doc) => {
                let result = evaluate(doc, filters);
                match result.reason() {
                    None => Outcome::passed(doc),
                    Some(reason) => Outcome::Filtered {
                        reason,
                        failed_axes: result.failed_axes,
                    },
                }
            }
            DetailState::FetchFailed(reason) => Outcome::FetchFailed {
                reason: reason.clone(),
            },
            DetailState::Unfetched => Outcome::FetchFailed {
                reason: "detail document was never fetched".to_string(),
            },
        };

        debug!(set_id = %self.set_id, outcome = outcome.label(), "Candidate decided");
        OutcomeRecord {
            candidate_id: self.set_id,
            display_name: self.display_name,
            outcome,
        }
    }
}

/// Decision for one candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Passed {
        active_ingredients: Vec<String>,
        route_forms: Vec<RouteForm>,
    },
    Filtered {
        reason: FilterAxis,
        failed_axes: Vec<FilterAxis>,
    },
    FetchFailed {
        reason: String,
    },
}

impl Outcome {
    fn passed(doc: &SplDocument) -> Self {
        let mut route_forms: Vec<RouteForm> = Vec::new();
        for pair in doc.route_forms() {
            if !route_forms.contains(pair) {
                route_forms.push(pair.clone());
            }
        }
        Outcome::Passed {
            active_ingredients: doc.active_ingredient_names().into_iter().collect(),
            route_forms,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Passed { .. } => "PASSED",
            Outcome::Filtered { .. } => "FILTERED",
            Outcome::FetchFailed { .. } => "FETCH_FAILED",
        }
    }
}

/// `{candidate_id, display_name, outcome, detail}` as handed to renderers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutcomeRecord {
    pub candidate_id: SetId,
    pub display_name: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl OutcomeRecord {
    pub fn is_passed(&self) -> bool {
        matches!(self.outcome, Outcome::Passed { .. })
    }

    pub fn is_filtered(&self) -> bool {
        matches!(self.outcome, Outcome::Filtered { .. })
    }

    pub fn is_fetch_failed(&self) -> bool {
        matches!(self.outcome, Outcome::FetchFailed { .. })
    }
}

/// Everything an advanced search produced
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchReport {
    /// One record per processed candidate, in query order
    pub records: Vec<OutcomeRecord>,
    /// `total_elements` reported by the remote search, if any
    pub total_remote_results: Option<u64>,
    /// Search rows dropped before becoming candidates
    pub malformed_rows: usize,
    /// Candidates left untouched when the deadline passed
    pub unprocessed: usize,
}

impl SearchReport {
    pub fn passed(&self) -> impl Iterator<Item = &OutcomeRecord> {
        self.records.iter().filter(|r| r.is_passed())
    }

    pub fn passed_count(&self) -> usize {
        self.passed().count()
    }

    pub fn filtered_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_filtered()).count()
    }

    pub fn fetch_failed_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_fetch_failed()).count()
    }
}
