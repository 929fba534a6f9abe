use std::result;

use crate::retry::RetryableError;
use thiserror::Error;

/// Maximum number of characters of a rejected response body kept for diagnostics
pub const MAX_BODY_PREVIEW_CHARS: usize = 200;

/// Error types for DailyMed client operations
#[derive(Error, Debug)]
pub enum DailyMedError {
    /// Connection failure, timeout, or any other transport-level problem
    #[error("Remote service unavailable: {message}")]
    RemoteUnavailable { message: String },

    /// The remote answered with a non-success status code
    #[error("Remote rejected request with status {status}: {body}")]
    RemoteRejected { status: u16, body: String },

    /// The payload could not be decoded into the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A detail document is not an SPL document at all
    #[error("SPL document {set_id} could not be parsed: {reason}")]
    DocumentUnparseable { set_id: String, reason: String },

    /// Invalid query parameters or identifiers
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// API rate limit exceeded
    #[error("API rate limit exceeded")]
    RateLimitExceeded,
}

pub type Result<T> = result::Result<T, DailyMedError>;

impl DailyMedError {
    /// Build a `RemoteRejected` error, truncating the body to a short preview
    pub fn rejected(status: u16, body: &str) -> Self {
        DailyMedError::RemoteRejected {
            status,
            body: truncate_body(body),
        }
    }
}

/// Truncate a response body to [`MAX_BODY_PREVIEW_CHARS`] characters
pub fn truncate_body(body: &str) -> String {
    let body = body.trim();
    match body.char_indices().nth(MAX_BODY_PREVIEW_CHARS) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

impl From<reqwest::Error> for DailyMedError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return DailyMedError::rejected(status.as_u16(), &err.to_string());
        }
        if err.is_decode() {
            return DailyMedError::MalformedResponse(err.to_string());
        }
        DailyMedError::RemoteUnavailable {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for DailyMedError {
    fn from(err: serde_json::Error) -> Self {
        DailyMedError::MalformedResponse(format!("JSON decoding failed: {err}"))
    }
}

impl RetryableError for DailyMedError {
    fn is_retryable(&self) -> bool {
        match self {
            // Network errors are typically transient
            DailyMedError::RemoteUnavailable { .. } => true,

            // Rate limiting should be retried after delay
            DailyMedError::RateLimitExceeded => true,

            // Server errors (5xx) and rate limiting (429) are retryable
            DailyMedError::RemoteRejected { status, .. } => {
                (500..600).contains(status) || *status == 429
            }

            DailyMedError::MalformedResponse(_)
            | DailyMedError::DocumentUnparseable { .. }
            | DailyMedError::InvalidQuery(_) => false,
        }
    }

    fn retry_reason(&self) -> &str {
        match self {
            DailyMedError::RemoteUnavailable { .. } => "Network error",
            DailyMedError::RateLimitExceeded => "Rate limit exceeded",
            DailyMedError::RemoteRejected { status, .. } => match status {
                429 => "Rate limit exceeded",
                500..=599 => "Server error",
                _ => "Request rejected",
            },
            DailyMedError::MalformedResponse(_) => "Invalid response payload",
            DailyMedError::DocumentUnparseable { .. } => "Invalid SPL document",
            DailyMedError::InvalidQuery(_) => "Invalid query",
        }
    }
}
