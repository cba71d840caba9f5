//! Decoding of `_search` response bodies into ranked `(id, score)` pairs.

use serde::Deserialize;

use super::error::SearchError;

#[derive(Debug, Deserialize)]
struct ResponseBody {
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    total: HitTotal,
    #[serde(default)]
    hits: Vec<RawHit>,
}

/// Older backends report a bare count, newer ones `{ "value", "relation" }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HitTotal {
    Count(u64),
    Counted { value: u64 },
}

impl HitTotal {
    fn value(&self) -> u64 {
        match self {
            Self::Count(n) | Self::Counted { value: n } => *n,
        }
    }
}

/// Backend-native hit. Fields other than `_id` and `_score` are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct RawHit {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredId {
    pub id: String,
    pub score: f64,
}

impl ScoredId {
    pub fn new(id: impl Into<String>, score: f64) -> Self {
        Self {
            id: id.into(),
            score,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecodedHits {
    /// Backend order, which is descending by score.
    pub hits: Vec<ScoredId>,
    /// Total the backend claims matched, possibly more than `hits.len()`.
    pub total: u64,
    /// Set when `total` exceeds the hits actually returned.
    pub truncated: bool,
}

impl DecodedHits {
    pub fn returned(&self) -> usize {
        self.hits.len()
    }
}

pub fn decode(body: &[u8]) -> Result<DecodedHits, SearchError> {
    let body: ResponseBody = serde_json::from_slice(body)?;
    Ok(from_envelope(body.hits))
}

pub fn decode_value(body: serde_json::Value) -> Result<DecodedHits, SearchError> {
    let body: ResponseBody = serde_json::from_value(body)?;
    Ok(from_envelope(body.hits))
}

fn from_envelope(envelope: HitsEnvelope) -> DecodedHits {
    let total = envelope.total.value();
    let hits: Vec<ScoredId> = envelope
        .hits
        .into_iter()
        .map(|hit| ScoredId {
            id: hit.id,
            score: hit.score.unwrap_or(0.0),
        })
        .collect();

    let truncated = total > hits.len() as u64;
    if truncated {
        tracing::info!(
            total = total,
            returned = hits.len(),
            "search_results_truncated"
        );
    }

    DecodedHits {
        hits,
        total,
        truncated,
    }
}
