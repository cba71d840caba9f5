//! Errors surfaced by the search pipeline.
//!
//! Only genuine failures live here. An empty term, a truncated hit list, an
//! id with no resolvable object, and an exhausted cursor are all normal
//! outcomes and never produce a `SearchError`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("search backend returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("unexpected search response shape: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid search root '{root}': {reason}")]
    InvalidRoot { root: String, reason: String },

    #[error("object lookup failed: {0}")]
    ObjectLookup(String),

    #[error("could not read search term: {0}")]
    Input(String),
}

impl SearchError {
    /// True when the backend could not be reached or refused the request.
    pub fn is_backend_failure(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Status { .. })
    }
}
