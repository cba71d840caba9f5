//! Term normalization for the backend's query-string syntax.
//!
//! A raw term is trimmed, and unless it already names a field (`name:` or
//! `type:`), each unquoted token gets a fuzziness marker and the whole term
//! is scoped to the default `name` field:
//!
//! ```text
//! "  cat dog  "     -> "name:cat~ dog~"
//! "\"exact\" cat"   -> "name:\"exact\" cat~"
//! "type:folder"     -> "type:folder"
//! ```

use std::fmt;

/// Field searched when the term carries no explicit selector.
pub const DEFAULT_FIELD: &str = "name";

/// Selectors that switch a term out of default format.
const FIELD_SELECTORS: [&str; 2] = ["name:", "type:"];

/// Backend annotation allowing matches within an edit distance of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Fuzziness {
    /// `None` lets the backend choose its default distance.
    pub edit_distance: Option<u8>,
}

impl Fuzziness {
    pub fn new(edit_distance: Option<u8>) -> Self {
        Self { edit_distance }
    }

    fn annotate(&self, token: &str) -> String {
        match self.edit_distance {
            Some(distance) => format!("{token}~{distance}"),
            None => format!("{token}~"),
        }
    }
}

/// Query string ready for the backend. Never has surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Default, Hash)]
pub struct ProcessedQuery(String);

impl ProcessedQuery {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// An empty query matches nothing.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ProcessedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProcessedQuery {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TermProcessor {
    fuzziness: Fuzziness,
}

impl TermProcessor {
    pub fn new(fuzziness: Fuzziness) -> Self {
        Self { fuzziness }
    }

    pub fn fuzziness(&self) -> Fuzziness {
        self.fuzziness
    }

    pub fn normalize(&self, raw: &str) -> ProcessedQuery {
        let term = raw.trim();
        if term.is_empty() {
            return ProcessedQuery::default();
        }
        if !is_default_format(term) {
            return ProcessedQuery(term.to_string());
        }

        // Quoted phrases are exact matches, including every word inside them.
        let mut in_phrase = false;
        let annotated = term
            .split_whitespace()
            .map(|token| {
                let quotes = token.matches('"').count();
                let exact = in_phrase || quotes > 0;
                if quotes % 2 == 1 {
                    in_phrase = !in_phrase;
                }
                if exact {
                    token.to_string()
                } else {
                    self.fuzziness.annotate(token)
                }
            })
            .collect::<Vec<_>>()
            .join(" ");

        ProcessedQuery(format!("{DEFAULT_FIELD}:{annotated}"))
    }
}

/// True when the term names no field, so it should search the default one.
pub fn is_default_format(term: &str) -> bool {
    !FIELD_SELECTORS
        .iter()
        .any(|selector| term.contains(selector))
}
