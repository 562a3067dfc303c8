//! The pagination state machine
//!
//! # Overview
//!
//! [`PagedCursor`] presents a restartable, finite, lazy sequence of
//! items drawn in page-sized chunks from a [`WindowSource`], while
//! respecting an overall item cap.
//!
//! Construction runs the count query once and clamps the requested cap
//! and window size against the reported total. Each call to
//! [`PagedCursor::iter`] starts a fresh pass from offset zero; the
//! `&mut` borrow it takes means only one pass can be live at a time.
//!
//! Iteration terminates on either of two independent conditions:
//! the cumulative offset reaching the cap, or the source returning an
//! empty page while the offset is still below the cap (the total shrank
//! after it was counted). The second case is exhaustion, not an error.

mod types;

pub use types::CursorConfig;

use crate::error::Result;
use crate::query::QuerySpec;
use crate::source::WindowSource;
use crate::types::JsonValue;
use tracing::debug;

/// A restartable cursor over the full result set of a search query.
///
/// Page fetches are blocking round-trips through the source; the
/// sequence is pulled one item at a time and fetches pages on demand.
/// Abandoning a pass mid-iteration is always safe: the cursor holds no
/// external resource between pulls.
pub struct PagedCursor<S: WindowSource> {
    source: S,
    query: QuerySpec,
    total_cap: u64,
    window_size: u64,
}

impl<S: WindowSource> PagedCursor<S> {
    /// Create a cursor with the default configuration (all matches,
    /// window of [`DEFAULT_WINDOW_SIZE`](crate::DEFAULT_WINDOW_SIZE)).
    ///
    /// Runs the count query against the source.
    pub fn new(source: S, query: QuerySpec) -> Result<Self> {
        Self::with_config(source, query, CursorConfig::default())
    }

    /// Create a cursor with an explicit configuration.
    ///
    /// Runs the count query once; the effective cap is the requested cap
    /// clamped to the actual match count (or the full count when no cap
    /// was requested), and the effective window size is clamped into
    /// `1..=cap` whenever the cap is nonzero.
    pub fn with_config(source: S, query: QuerySpec, config: CursorConfig) -> Result<Self> {
        let actual_total = source.count(&query)?;

        let total_cap = match config.cap {
            Some(cap) => cap.min(actual_total),
            None => actual_total,
        };
        let window_size = if total_cap == 0 {
            0
        } else {
            config.window_size.clamp(1, total_cap)
        };

        debug!(
            actual_total,
            total_cap, window_size, "cursor constructed"
        );

        Ok(Self {
            source,
            query,
            total_cap,
            window_size,
        })
    }

    /// Start an iteration pass from the beginning.
    ///
    /// Safe to call any number of times; each call restarts at offset
    /// zero. The first page is fetched on the first pull, so a failing
    /// source surfaces through the returned iterator, not here.
    pub fn iter(&mut self) -> Items<'_, S> {
        Items {
            cursor: self,
            offset: 0,
            page: Vec::new(),
            position: 0,
            exhausted: false,
        }
    }

    /// The effective item cap: the requested cap clamped to the match
    /// count reported at construction.
    pub fn total_cap(&self) -> u64 {
        self.total_cap
    }

    /// The effective window size.
    pub fn window_size(&self) -> u64 {
        self.window_size
    }

    /// The query this cursor iterates.
    pub fn query(&self) -> &QuerySpec {
        &self.query
    }

    /// The underlying source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Consume the cursor, returning the source.
    pub fn into_source(self) -> S {
        self.source
    }
}

impl<S: WindowSource> std::fmt::Debug for PagedCursor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PagedCursor")
            .field("query", &self.query)
            .field("total_cap", &self.total_cap)
            .field("window_size", &self.window_size)
            .finish_non_exhaustive()
    }
}

impl<'a, S: WindowSource> IntoIterator for &'a mut PagedCursor<S> {
    type Item = Result<JsonValue>;
    type IntoIter = Items<'a, S>;

    fn into_iter(self) -> Items<'a, S> {
        self.iter()
    }
}

/// A single iteration pass over a [`PagedCursor`].
///
/// Yields `Result<JsonValue>`: a fetch failure is delivered at the pull
/// that triggered it. The failed window was not consumed, so pulling
/// again re-attempts the same fetch; dropping the iterator abandons the
/// pass with no cleanup required.
pub struct Items<'a, S: WindowSource> {
    cursor: &'a mut PagedCursor<S>,
    /// Items consumed across all completed pages
    offset: u64,
    /// Most recently fetched page
    page: Vec<JsonValue>,
    /// Index of the next unconsumed item in `page`
    position: usize,
    exhausted: bool,
}

impl<S: WindowSource> Items<'_, S> {
    /// Advance past the consumed page and fetch the next one.
    ///
    /// Only called with the offset still below the cap; the remaining
    /// terminal condition here is the source handing back an empty page
    /// early (its total shrank after the count).
    fn fetch_next_page(&mut self) -> Result<()> {
        self.offset += self.page.len() as u64;
        self.page.clear();
        self.position = 0;

        let body = self
            .cursor
            .query
            .windowed(self.offset, self.cursor.window_size);
        let page = self.cursor.source.search(&body)?;

        debug!(
            offset = self.offset,
            fetched = page.len(),
            "fetched page"
        );

        if page.is_empty() {
            self.exhausted = true;
        }
        self.page = page;
        Ok(())
    }
}

impl<S: WindowSource> Iterator for Items<'_, S> {
    type Item = Result<JsonValue>;

    fn next(&mut self) -> Option<Result<JsonValue>> {
        if self.exhausted {
            return None;
        }

        // The cap can land mid-page: the page was fetched whole, but no
        // item past the cap is ever produced.
        if self.offset + self.position as u64 >= self.cursor.total_cap {
            self.exhausted = true;
            return None;
        }

        if self.position >= self.page.len() {
            if let Err(e) = self.fetch_next_page() {
                return Some(Err(e));
            }
            if self.page.is_empty() {
                return None;
            }
        }

        let item = std::mem::take(&mut self.page[self.position]);
        self.position += 1;
        Some(Ok(item))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // The source may shrink mid-pass, so only the upper bound holds.
        let produced = self.offset + self.position as u64;
        let remaining = self.cursor.total_cap.saturating_sub(produced);
        (0, usize::try_from(remaining).ok())
    }
}

impl<S: WindowSource> std::iter::FusedIterator for Items<'_, S> {}

#[cfg(test)]
mod tests;
