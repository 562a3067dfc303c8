//! # Windowed Cursor
//!
//! Client-side offset pagination over a remote document-search service.
//!
//! Iterate the full result set of a search query without managing page
//! offsets by hand: the cursor issues repeated bounded-window queries
//! (`from` + `size`) against the source and exposes the results as a
//! single lazy, finite sequence.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use windowed_cursor::{CursorConfig, HttpSearchSource, PagedCursor, QuerySpec, Result};
//!
//! fn main() -> Result<()> {
//!     let source = HttpSearchSource::builder()
//!         .base_url("http://localhost:9200")
//!         .index("bank")
//!         .build()?;
//!
//!     let config = CursorConfig::new().cap(200).window_size(10);
//!     let mut cursor = PagedCursor::with_config(source, QuerySpec::match_all(), config)?;
//!
//!     for doc in cursor.iter() {
//!         println!("{}", doc?["_id"]);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                      PagedCursor                        │
//! │  count once at construction → clamp cap and window      │
//! │  iter() → Items: pull-driven page fetches               │
//! └─────────────────────────────────────────────────────────┘
//!                            │
//! ┌──────────────┬───────────┴────────────┬─────────────────┐
//! │   QuerySpec  │      WindowSource      │ HttpSearchSource│
//! ├──────────────┼────────────────────────┼─────────────────┤
//! │ opaque body  │ count(query)           │ POST _search    │
//! │ from/size    │ search(windowed body)  │ hits.total      │
//! │ injection    │                        │ hits.hits       │
//! └──────────────┴────────────────────────┴─────────────────┘
//! ```
//!
//! ## Limitations
//!
//! These are deliberate; the cursor is a thin client-side helper:
//!
//! - Fetch failures are surfaced at the pull that triggered them, never
//!   retried.
//! - Deep offsets eventually hit the source's own result-window ceiling
//!   (`from + size` capped server-side). The fix is a server-held scroll
//!   cursor, which this crate does not implement.
//! - A single cursor instance supports one iteration pass at a time; the
//!   `&mut` borrow taken by [`PagedCursor::iter`] enforces this.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the crate
pub mod error;

/// Common types and type aliases
pub mod types;

/// Query specification and window injection
pub mod query;

/// The windowed-query capability and its HTTP implementation
pub mod source;

/// The pagination state machine
pub mod cursor;

// ============================================================================
// Re-exports
// ============================================================================

pub use cursor::{CursorConfig, Items, PagedCursor};
pub use error::{Error, Result};
pub use query::QuerySpec;
pub use source::{HttpSearchSource, HttpSourceConfig, WindowSource};
pub use types::{JsonObject, JsonValue, DEFAULT_WINDOW_SIZE};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
