//! Term normalization
//!
//! Ingredient, route and form strings are normalized once, when they are
//! parsed out of a document or put into a criteria set. Every later
//! comparison is plain equality.

use std::collections::BTreeSet;

/// Trim, collapse internal whitespace and lowercase
///
/// # Examples
///
/// ```
/// use dailymed_client::normalize_term;
///
/// assert_eq!(normalize_term("  Sodium   CHLORIDE\n"), "sodium chloride");
/// assert_eq!(normalize_term("ORAL"), "oral");
/// ```
pub fn normalize_term(term: &str) -> String {
    term.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Normalize a collection of terms into a deduplicated set, dropping empties
pub fn normalize_terms<I, S>(terms: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    terms
        .into_iter()
        .map(|t| normalize_term(t.as_ref()))
        .filter(|t| !t.is_empty())
        .collect()
}
