//! Advanced search: remote query, per-label fetch and client-side filtering

pub mod criteria;
pub mod filter;
pub mod outcome;
pub mod pipeline;

pub use criteria::SearchCriteria;
pub use filter::{FilterAxis, FilterCriteria, FilterCriteriaBuilder, FilterResult, evaluate, matches};
pub use outcome::{Candidate, DetailState, Outcome, OutcomeRecord, SearchReport};
pub use pipeline::{AdvancedSearch, DEFAULT_CONCURRENCY};
