//! Cursor configuration

use crate::types::DEFAULT_WINDOW_SIZE;

/// Configuration for a [`PagedCursor`](super::PagedCursor)
///
/// `cap` bounds the total number of items the caller wants; unset means
/// "all matches". `window_size` is the number of items requested per
/// page. Both are clamped against the source's reported total at cursor
/// construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorConfig {
    /// Maximum number of items to produce (None = all matches)
    pub cap: Option<u64>,
    /// Items requested per page
    pub window_size: u64,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            cap: None,
            window_size: DEFAULT_WINDOW_SIZE,
        }
    }
}

impl CursorConfig {
    /// Create a config with defaults (unbounded, window of
    /// [`DEFAULT_WINDOW_SIZE`])
    pub fn new() -> Self {
        Self::default()
    }

    /// Bound the total number of items produced
    #[must_use]
    pub fn cap(mut self, cap: u64) -> Self {
        self.cap = Some(cap);
        self
    }

    /// Set the number of items requested per page
    #[must_use]
    pub fn window_size(mut self, size: u64) -> Self {
        self.window_size = size;
        self
    }
}
