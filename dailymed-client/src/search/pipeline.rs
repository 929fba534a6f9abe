//! Query → fetch → filter → aggregate
//!
//! The remote query runs once for the requested page. Each resulting
//! candidate is then fetched and filtered independently, at most
//! `concurrency` at a time. Records come back in query order regardless of
//! which fetch finishes first.

use std::pin::pin;
use std::time::Duration;

use futures_util::future;
use futures_util::stream::{self, StreamExt};
use tokio::time::{Instant, sleep_until, timeout_at};
use tracing::{info, instrument, warn};

use crate::dailymed::DailyMedClient;
use crate::error::Result;
use crate::search::criteria::SearchCriteria;
use crate::search::outcome::{Candidate, SearchReport};

/// Detail fetches in flight when no concurrency is configured
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Advanced search runner
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use dailymed_client::{AdvancedSearch, DailyMedClient, FilterCriteria, SearchCriteria};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let search = AdvancedSearch::new(DailyMedClient::new())
///         .with_concurrency(8)
///         .with_timeout(Duration::from_secs(60));
///
///     let criteria = SearchCriteria::by_drug_name(
///         "naproxen",
///         FilterCriteria::builder().only_active(["naproxen sodium"]).build(),
///     );
///
///     let report = search.run(&criteria).await?;
///     println!(
///         "{} passed, {} filtered, {} failed, {} unprocessed",
///         report.passed_count(),
///         report.filtered_count(),
///         report.fetch_failed_count(),
///         report.unprocessed
///     );
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AdvancedSearch {
    client: DailyMedClient,
    concurrency: usize,
    timeout: Option<Duration>,
}

impl AdvancedSearch {
    pub fn new(client: DailyMedClient) -> Self {
        Self {
            client,
            concurrency: DEFAULT_CONCURRENCY,
            timeout: None,
        }
    }

    /// Maximum number of detail fetches in flight (at least 1)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Overall deadline for the fetch stage
    ///
    /// When it passes, no new fetches are issued, in-flight fetches are
    /// abandoned and the remaining candidates are reported as unprocessed.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Run the search
    ///
    /// # Errors
    ///
    /// Only the query stage can fail the run. Per-candidate problems are
    /// reported as `FETCH_FAILED` records.
    #[instrument(skip_all, fields(drug_name = ?criteria.query.get_drug_name(), ndc = ?criteria.query.get_ndc()))]
    pub async fn run(&self, criteria: &SearchCriteria) -> Result<SearchReport> {
        let deadline = self.timeout.map(|timeout| Instant::now() + timeout);

        let page = self.client.search_spls(&criteria.query).await?;
        let candidates: Vec<Candidate> = page.items.iter().map(Candidate::from_summary).collect();
        let total = candidates.len();
        info!(candidates = total, "Query stage complete");

        // Candidates stop being pulled once the deadline passes, even if the
        // query stage already used it up.
        let expired = async move {
            match deadline {
                Some(deadline) => sleep_until(deadline).await,
                None => future::pending::<()>().await,
            }
        };

        let client = &self.client;
        let filters = &criteria.filters;
        let mut outcomes = pin!(
            stream::iter(candidates)
                .take_until(expired)
                .map(|mut candidate| async move {
                    candidate.fetch(client).await;
                    candidate.into_record(filters)
                })
                .buffered(self.concurrency)
        );

        let mut records = Vec::with_capacity(total);
        loop {
            let next = match deadline {
                // In-flight fetches are abandoned at the deadline
                Some(deadline) => timeout_at(deadline, outcomes.next()).await.ok().flatten(),
                None => outcomes.next().await,
            };
            match next {
                Some(record) => records.push(record),
                None => break,
            }
        }

        if records.len() < total {
            warn!(
                processed = records.len(),
                remaining = total - records.len(),
                "Advanced search deadline passed, returning partial results"
            );
        }

        let report = SearchReport {
            unprocessed: total - records.len(),
            records,
            total_remote_results: page.pagination.total_elements,
            malformed_rows: page.malformed_rows,
        };

        info!(
            passed = report.passed_count(),
            filtered = report.filtered_count(),
            fetch_failed = report.fetch_failed_count(),
            unprocessed = report.unprocessed,
            "Advanced search complete"
        );
        Ok(report)
    }
}
