//! Forward-only cursor over the current result set.

use std::sync::Arc;

use super::resolve::ResolvedMatch;

/// Outcome of advancing a cursor.
#[derive(Debug, Clone, PartialEq)]
pub enum CursorStep {
    Match(ResolvedMatch),
    /// No more results. Not an error.
    Exhausted,
}

impl CursorStep {
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }

    pub fn as_match(&self) -> Option<&ResolvedMatch> {
        match self {
            Self::Match(m) => Some(m),
            Self::Exhausted => None,
        }
    }

    pub fn into_match(self) -> Option<ResolvedMatch> {
        match self {
            Self::Match(m) => Some(m),
            Self::Exhausted => None,
        }
    }
}

/// Position `-1` is "before first"; the position saturates at `len()`,
/// where every further `next()` reports [`CursorStep::Exhausted`].
#[derive(Debug, Clone)]
pub struct ResultCursor {
    results: Arc<[ResolvedMatch]>,
    position: isize,
}

impl Default for ResultCursor {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl ResultCursor {
    pub fn new(results: impl Into<Arc<[ResolvedMatch]>>) -> Self {
        Self {
            results: results.into(),
            position: -1,
        }
    }

    /// Restart from the top and return the first result.
    pub fn first(&mut self) -> CursorStep {
        self.position = -1;
        self.next()
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> CursorStep {
        let len = self.len() as isize;
        if self.position < len {
            self.position += 1;
        }
        match self.results.get(self.position as usize) {
            Some(m) => CursorStep::Match(m.clone()),
            None => CursorStep::Exhausted,
        }
    }

    pub fn results(&self) -> Arc<[ResolvedMatch]> {
        Arc::clone(&self.results)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn position(&self) -> isize {
        self.position
    }

    /// Results not yet returned by `next()`.
    pub fn remaining(&self) -> usize {
        self.len().saturating_sub((self.position + 1).max(0) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::resolve::DomainObject;
    use serde_json::json;

    fn matches(n: usize) -> Vec<ResolvedMatch> {
        (0..n)
            .map(|i| ResolvedMatch {
                id: format!("m{i}"),
                object: Arc::new(DomainObject::new(format!("m{i}"), json!({ "i": i }))),
                score: (n - i) as f64,
            })
            .collect()
    }

    fn id(step: CursorStep) -> String {
        step.into_match().expect("expected a match").id
    }

    #[test]
    fn first_then_next_walks_in_order_then_exhausts() {
        let mut cursor = ResultCursor::new(matches(3));
        assert_eq!(id(cursor.first()), "m0");
        assert_eq!(id(cursor.next()), "m1");
        assert_eq!(id(cursor.next()), "m2");
        assert!(cursor.next().is_exhausted());
        for _ in 0..5 {
            assert!(cursor.next().is_exhausted());
        }
        assert_eq!(cursor.position(), 3);
    }

    #[test]
    fn first_restarts_after_exhaustion() {
        let mut cursor = ResultCursor::new(matches(2));
        cursor.first();
        cursor.next();
        assert!(cursor.next().is_exhausted());
        assert_eq!(id(cursor.first()), "m0");
        assert_eq!(cursor.remaining(), 1);
    }

    #[test]
    fn next_before_first_starts_at_top() {
        let mut cursor = ResultCursor::new(matches(2));
        assert_eq!(cursor.position(), -1);
        assert_eq!(cursor.remaining(), 2);
        assert_eq!(id(cursor.next()), "m0");
    }

    #[test]
    fn empty_cursor_is_immediately_exhausted() {
        let mut cursor = ResultCursor::default();
        assert!(cursor.is_empty());
        assert!(cursor.first().is_exhausted());
        assert!(cursor.next().is_exhausted());
        assert_eq!(cursor.position(), 0);
        assert_eq!(cursor.remaining(), 0);
    }
}
