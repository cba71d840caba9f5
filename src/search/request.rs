//! Request construction for the `_search` URI endpoint.

use std::num::{NonZeroU64, NonZeroUsize};

use reqwest::Url;

use super::error::SearchError;
use super::term::ProcessedQuery;

/// Result cap applied when the caller gives none (or a non-positive one).
pub const DEFAULT_MAX_RESULTS: NonZeroUsize = match NonZeroUsize::new(100) {
    Some(n) => n,
    None => unreachable!(),
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: ProcessedQuery,
    pub max_results: NonZeroUsize,
    /// Advisory hint for the backend; nothing enforces it locally.
    pub timeout_ms: Option<NonZeroU64>,
}

impl SearchRequest {
    /// `GET {root}/_search/?q=..&size=..[&timeout=..ms]`, percent-encoded.
    pub fn to_url(&self, root: &str) -> Result<Url, SearchError> {
        let base = format!("{}/_search/", root.trim_end_matches('/'));
        let mut url = Url::parse(&base).map_err(|e| SearchError::InvalidRoot {
            root: root.to_string(),
            reason: e.to_string(),
        })?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("q", self.query.as_str())
                .append_pair("size", &self.max_results.to_string());
            if let Some(timeout) = self.timeout_ms {
                pairs.append_pair("timeout", &format!("{timeout}ms"));
            }
        }

        Ok(url)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct QueryBuilder {
    default_max_results: NonZeroUsize,
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self {
            default_max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl QueryBuilder {
    /// A zero `default_max_results` falls back to [`DEFAULT_MAX_RESULTS`].
    pub fn new(default_max_results: usize) -> Self {
        Self {
            default_max_results: NonZeroUsize::new(default_max_results)
                .unwrap_or(DEFAULT_MAX_RESULTS),
        }
    }

    pub fn default_max_results(&self) -> NonZeroUsize {
        self.default_max_results
    }

    /// Non-positive caps are corrected to the default; a zero timeout is
    /// treated as absent.
    pub fn build(
        &self,
        query: ProcessedQuery,
        max_results: Option<i64>,
        timeout_ms: Option<u64>,
    ) -> SearchRequest {
        let max_results = max_results
            .and_then(|n| usize::try_from(n).ok())
            .and_then(NonZeroUsize::new)
            .unwrap_or(self.default_max_results);

        SearchRequest {
            query,
            max_results,
            timeout_ms: timeout_ms.and_then(NonZeroU64::new),
        }
    }
}
