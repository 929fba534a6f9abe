use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use dailymed_client::{AdvancedSearch, FilterCriteria, OutcomeRecord, SearchCriteria, SearchReport};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use super::search::SplQueryArgs;
use super::{ClientOptions, OutputArgs, create_client, output_json};

#[derive(Args, Debug)]
pub struct AdvancedSearchCmd {
    #[command(flatten)]
    pub query: SplQueryArgs,

    /// Keep labels with any of these routes (repeatable, e.g. --route ORAL)
    #[arg(long = "route", value_name = "ROUTE")]
    pub routes: Vec<String>,

    /// Keep labels with any of these dosage forms (repeatable)
    #[arg(long = "form", value_name = "FORM")]
    pub forms: Vec<String>,

    /// Require all of these active ingredients (repeatable)
    #[arg(long, value_name = "NAME")]
    pub include_active: Vec<String>,

    /// Reject labels with any of these active ingredients (repeatable)
    #[arg(long, value_name = "NAME")]
    pub exclude_active: Vec<String>,

    /// Require exactly this set of active ingredients (repeatable)
    #[arg(long, value_name = "NAME")]
    pub only_active: Vec<String>,

    /// Require all of these inactive ingredients (repeatable)
    #[arg(long, value_name = "NAME")]
    pub include_inactive: Vec<String>,

    /// Reject labels with any of these inactive ingredients (repeatable)
    #[arg(long, value_name = "NAME")]
    pub exclude_inactive: Vec<String>,

    /// Maximum concurrent label downloads
    #[arg(long, default_value = "4")]
    pub concurrency: usize,

    /// Stop fetching after this many seconds and report what was processed
    #[arg(long, value_name = "SECONDS")]
    pub deadline: Option<u64>,

    /// Also print FILTERED and FETCH_FAILED records
    #[arg(long)]
    pub include_rejected: bool,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// What gets printed: the selected records plus the run summary
#[derive(Debug, Serialize)]
struct AdvancedSearchOutput<'a> {
    records: Vec<&'a OutcomeRecord>,
    passed: usize,
    filtered: usize,
    fetch_failed: usize,
    unprocessed: usize,
    malformed_rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_remote_results: Option<u64>,
}

impl<'a> AdvancedSearchOutput<'a> {
    fn new(report: &'a SearchReport, include_rejected: bool) -> Self {
        let records = report
            .records
            .iter()
            .filter(|record| include_rejected || record.is_passed())
            .collect();

        Self {
            records,
            passed: report.passed_count(),
            filtered: report.filtered_count(),
            fetch_failed: report.fetch_failed_count(),
            unprocessed: report.unprocessed,
            malformed_rows: report.malformed_rows,
            total_remote_results: report.total_remote_results,
        }
    }
}

impl AdvancedSearchCmd {
    pub fn to_criteria(&self) -> Result<SearchCriteria> {
        let filters = FilterCriteria::builder()
            .routes(&self.routes)
            .forms(&self.forms)
            .include_active(&self.include_active)
            .exclude_active(&self.exclude_active)
            .only_active(&self.only_active)
            .include_inactive(&self.include_inactive)
            .exclude_inactive(&self.exclude_inactive)
            .build();

        let criteria = SearchCriteria::new(self.query.to_query()?, filters);
        criteria.validate()?;
        Ok(criteria)
    }

    pub async fn execute(&self, options: &ClientOptions) -> Result<()> {
        let criteria = self.to_criteria()?;
        if criteria.filters.is_empty() {
            tracing::info!("No client-side filters given, every fetched label will pass");
        }

        let mut search =
            AdvancedSearch::new(create_client(options)?).with_concurrency(self.concurrency);
        if let Some(seconds) = self.deadline {
            search = search.with_timeout(Duration::from_secs(seconds));
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .context("Failed to set progress bar style")?,
        );
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner.set_message("Searching and filtering labels");

        let report = match search.run(&criteria).await {
            Ok(report) => {
                spinner.finish_with_message(format!(
                    "{} passed, {} filtered, {} failed to fetch",
                    report.passed_count(),
                    report.filtered_count(),
                    report.fetch_failed_count()
                ));
                report
            }
            Err(err) => {
                spinner.finish_with_message("Search failed");
                return Err(err).context("Advanced search failed");
            }
        };

        if report.unprocessed > 0 {
            tracing::warn!(
                unprocessed = report.unprocessed,
                "Deadline reached before every label was processed"
            );
        }

        output_json(
            &AdvancedSearchOutput::new(&report, self.include_rejected),
            self.output.path(),
        )
        .await
    }
}
