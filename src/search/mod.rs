//! Search layer facade.
//!
//! - **[`term`]**: Raw term normalization (trimming, fuzziness, default field).
//! - **[`request`]**: Request construction and URL encoding for `_search`.
//! - **[`transport`]**: HTTP transport trait and the reqwest implementation.
//! - **[`decode`]**: Response decoding into ranked `(id, score)` pairs.
//! - **[`resolve`]**: Object lookup, type filtering, and resolved matches.
//! - **[`object_store`]**: JSON snapshot object service.
//! - **[`cursor`]**: Forward-only cursor over the latest results.
//! - **[`input`]**: Sources of raw user terms.
//! - **[`service`]**: The orchestrating `SearchService`.

pub mod cursor;
pub mod decode;
pub mod error;
pub mod input;
pub mod object_store;
pub mod request;
pub mod resolve;
pub mod service;
pub mod term;
pub mod transport;

pub use cursor::{CursorStep, ResultCursor};
pub use error::SearchError;
pub use resolve::{AcceptTypes, DomainObject, ObjectService, ResolvedMatch, TypeFilter};
pub use service::{SearchService, SearchSummary};
