//! # DailyMed Client
//!
//! An async Rust client for the DailyMed v2 REST services (Structured Product
//! Labels, NDCs, drug classes, UNIIs) and the RxCUI terminology lookup.
//!
//! ## Features
//!
//! - **Remote listings**: every DailyMed listing endpoint with explicit pagination
//! - **SPL parsing**: tolerant extraction of ingredients, routes and dosage forms
//! - **Advanced search**: remote query followed by per-label fetch and client-side
//!   filtering on route, form and active/inactive ingredients
//! - **Injectable transport**: swap the HTTP layer for a stub in tests
//!
//! ## Quick Start
//!
//! ```no_run
//! use dailymed_client::{AdvancedSearch, DailyMedClient, FilterCriteria, SearchCriteria, SplQuery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = DailyMedClient::new();
//!
//!     let criteria = SearchCriteria::new(
//!         SplQuery::new().drug_name("ibuprofen").pagesize(20),
//!         FilterCriteria::builder()
//!             .route("ORAL")
//!             .forms(["TABLET", "CAPSULE"])
//!             .build(),
//!     );
//!
//!     let report = AdvancedSearch::new(client).run(&criteria).await?;
//!     for record in report.passed() {
//!         println!("{}: {}", record.candidate_id, record.display_name);
//!     }
//!     println!(
//!         "{} filtered, {} failed to fetch",
//!         report.filtered_count(),
//!         report.fetch_failed_count()
//!     );
//!
//!     Ok(())
//! }
//! ```

pub mod common;
pub mod config;
pub mod dailymed;
pub mod error;
pub mod rate_limit;
pub mod retry;
pub mod search;
pub mod spl;
pub mod transport;

pub use common::{Ndc, SetId, normalize_term};
pub use config::{ClientConfig, ResponseFormat};
pub use dailymed::{
    DailyMedClient, DrugClass, DrugClassQuery, DrugName, DrugNameQuery, NdcEntry, NdcQuery, Page,
    Pagination, RxConcept, RxcuiQuery, SplHistory, SplNdcs, SplPackaging, SplQuery,
    SplSearchPage, SplSummary, Unii, UniiQuery,
};
pub use error::{DailyMedError, Result};
pub use rate_limit::RateLimiter;
pub use retry::RetryConfig;
pub use search::{
    AdvancedSearch, Candidate, DetailState, FilterAxis, FilterCriteria, FilterResult, Outcome,
    OutcomeRecord, SearchCriteria, SearchReport, evaluate, matches,
};
pub use spl::{IngredientRecord, IngredientRole, RouteForm, SplDocument, SplParser, SplProduct};
pub use transport::{HttpTransport, Transport};
