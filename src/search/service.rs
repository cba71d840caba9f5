//! Search orchestration: term -> request -> backend -> decode -> resolve.
//!
//! The service owns one [`SearchSession`]: the latest result set and the
//! cursor over it, replaced together under a single lock when a search
//! completes. Overlapping searches are not merged; whichever finishes last
//! owns the session.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

use super::cursor::{CursorStep, ResultCursor};
use super::decode::decode;
use super::error::SearchError;
use super::input::TermSource;
use super::request::QueryBuilder;
use super::resolve::{ObjectService, ResolvedMatch, ResultResolver, TypeFilter};
use super::term::{Fuzziness, TermProcessor};
use super::transport::SearchTransport;
use crate::config::SearchConfig;

/// What the most recent search saw, for surfacing truncation to users.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchSummary {
    /// Processed query string sent to the backend.
    pub query: String,
    /// Total the backend claimed.
    pub total: u64,
    /// Hits actually returned by the backend.
    pub returned: usize,
    /// Hits left after object resolution and type filtering.
    pub resolved: usize,
    pub truncated: bool,
}

#[derive(Debug, Default)]
pub struct SearchSession {
    cursor: ResultCursor,
    summary: Option<SearchSummary>,
}

pub struct SearchService {
    root: String,
    terms: TermProcessor,
    builder: QueryBuilder,
    default_timeout_ms: Option<u64>,
    transport: Arc<dyn SearchTransport>,
    objects: Arc<dyn ObjectService>,
    session: Mutex<SearchSession>,
}

impl SearchService {
    pub fn new(
        config: &SearchConfig,
        transport: Arc<dyn SearchTransport>,
        objects: Arc<dyn ObjectService>,
    ) -> Self {
        Self {
            root: config.root.clone(),
            terms: TermProcessor::new(Fuzziness::new(config.edit_distance)),
            builder: QueryBuilder::new(config.default_max_results),
            default_timeout_ms: config.timeout_ms,
            transport,
            objects,
            session: Mutex::new(SearchSession::default()),
        }
    }

    /// Read the term from `source`, then [`search`](Self::search).
    pub async fn query<S, T>(
        &self,
        source: &S,
        valid_type: &T,
        max_results: Option<i64>,
        timeout_ms: Option<u64>,
    ) -> Result<CursorStep, SearchError>
    where
        S: TermSource + ?Sized,
        T: TypeFilter + ?Sized,
    {
        let raw = source.read_term()?;
        self.search(&raw, valid_type, max_results, timeout_ms).await
    }

    /// Run a search, replace the session with its results, and return the
    /// first one. On error the previous session is left untouched.
    ///
    /// A term that is empty after trimming never reaches the transport: it
    /// installs an empty result set and returns [`CursorStep::Exhausted`].
    pub async fn search<T>(
        &self,
        raw_term: &str,
        valid_type: &T,
        max_results: Option<i64>,
        timeout_ms: Option<u64>,
    ) -> Result<CursorStep, SearchError>
    where
        T: TypeFilter + ?Sized,
    {
        let query = self.terms.normalize(raw_term);
        let request = self.builder.build(
            query,
            max_results,
            timeout_ms.or(self.default_timeout_ms),
        );

        if request.query.is_empty() {
            debug!("empty search term; matching nothing");
            return Ok(self.install(Vec::new(), SearchSummary::default()));
        }

        let url = request.to_url(&self.root)?;
        info!(
            query = %request.query,
            size = request.max_results.get(),
            timeout_ms = ?request.timeout_ms,
            "search_start"
        );

        let body = self.transport.get(url).await?;
        let decoded = decode(&body)?;
        let mut summary = SearchSummary {
            query: request.query.into_string(),
            total: decoded.total,
            returned: decoded.returned(),
            resolved: 0,
            truncated: decoded.truncated,
        };

        let resolved = ResultResolver::new(self.objects.as_ref())
            .resolve(decoded.hits, valid_type)
            .await?;
        summary.resolved = resolved.len();

        Ok(self.install(resolved, summary))
    }

    fn install(&self, results: Vec<ResolvedMatch>, summary: SearchSummary) -> CursorStep {
        let mut session = self.session.lock();
        session.cursor = ResultCursor::new(results);
        session.summary = Some(summary);
        session.cursor.first()
    }

    /// Restart the current result set from the top.
    pub fn first(&self) -> CursorStep {
        self.session.lock().cursor.first()
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&self) -> CursorStep {
        self.session.lock().cursor.next()
    }

    /// Snapshot of the current result set.
    pub fn results(&self) -> Arc<[ResolvedMatch]> {
        self.session.lock().cursor.results()
    }

    /// `None` until a search has completed.
    pub fn last_summary(&self) -> Option<SearchSummary> {
        self.session.lock().summary.clone()
    }
}
