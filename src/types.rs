//! Common types used throughout windowed-cursor
//!
//! Shared type aliases and crate-wide constants.

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

// ============================================================================
// Constants
// ============================================================================

/// Default number of items requested per page when the caller does not
/// choose a window size.
pub const DEFAULT_WINDOW_SIZE: u64 = 1000;

/// Field name injected into each windowed query body for the page offset.
pub const FROM_FIELD: &str = "from";

/// Field name injected into each windowed query body for the page size.
pub const SIZE_FIELD: &str = "size";
