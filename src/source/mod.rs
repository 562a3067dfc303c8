//! Windowed-query capability
//!
//! The cursor depends on exactly one external capability: execute a
//! bounded window query and return a count and a page of items. That
//! capability is the [`WindowSource`] trait; [`HttpSearchSource`] is the
//! built-in implementation speaking the `_search` wire shape of a
//! document-search service.

mod http;

pub use http::{HttpSearchSource, HttpSourceConfig, HttpSourceConfigBuilder};

use crate::error::Result;
use crate::query::QuerySpec;
use crate::types::{JsonObject, JsonValue};

/// A synchronous, blocking source of windowed query results.
///
/// Both operations are single round-trips: the calling thread suspends
/// for the duration of the call and resumes with either a result or an
/// error. Failures are never masked; the cursor surfaces them unchanged.
pub trait WindowSource {
    /// Total number of items matching the query.
    ///
    /// Used once, when a cursor is constructed.
    fn count(&self, query: &QuerySpec) -> Result<u64>;

    /// Execute a windowed query body (already carrying `from` and `size`)
    /// and return the ordered page of matching items.
    ///
    /// The returned page is at most `size` items long; shorter pages mean
    /// the source ran out of matches. Used once per page fetch.
    fn search(&self, body: &JsonObject) -> Result<Vec<JsonValue>>;
}
