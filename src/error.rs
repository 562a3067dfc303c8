//! Error types for windowed-cursor
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! The cursor performs no retry, no backoff, and no partial-failure
//! recovery: every fetch failure propagates synchronously to the caller
//! at the pull that triggered it.

use thiserror::Error;

/// The main error type for windowed-cursor
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Query Errors
    // ============================================================================
    /// The caller-supplied query body is not usable
    #[error("Invalid query specification: {message}")]
    InvalidQuery { message: String },

    /// A response body was not valid JSON
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    /// Transport-level failure talking to the source
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The source answered with a non-success status
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// The source rejected a window past its server-enforced ceiling
    #[error("Result window too large (from={from}, size={size}): {message}")]
    WindowCeiling { from: u64, size: u64, message: String },

    /// The configured base URL does not parse
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Response Shape Errors
    // ============================================================================
    /// The source answered 2xx but the body is not a search response
    #[error("Malformed search response: {message}")]
    Response { message: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    /// Catch-all for errors outside the taxonomy above
    #[error("{0}")]
    Other(String),

    /// Wrapped error from a caller-supplied source
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create an invalid query error
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a window-ceiling error
    pub fn window_ceiling(from: u64, size: u64, message: impl Into<String>) -> Self {
        Self::WindowCeiling {
            from,
            size,
            message: message.into(),
        }
    }

    /// Create a malformed response error
    pub fn response(message: impl Into<String>) -> Self {
        Self::Response {
            message: message.into(),
        }
    }

    /// Check if this error is the source rejecting a too-deep window.
    ///
    /// Deep offsets can exceed the server-enforced result-window ceiling.
    /// The cursor does not work around this; callers that need deep
    /// iteration should use a server-held scroll cursor instead.
    pub fn is_window_ceiling(&self) -> bool {
        matches!(self, Self::WindowCeiling { .. })
    }
}

/// Result type alias for windowed-cursor
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
