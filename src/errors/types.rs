//! Error type definitions for the image catalog service

use thiserror::Error;

/// Top-level application error type
///
/// Uses `thiserror` to provide automatic error trait implementations and
/// proper error chaining from the layer-specific enums below.
#[derive(Error, Debug)]
pub enum AppError {
    /// Source fetch errors
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Cache state and persistence errors
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),

    /// Search query errors
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    /// Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Operation already in progress errors
    #[error("Operation already in progress: {operation}")]
    OperationInProgress { operation: String },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Source fetch specific errors
///
/// All of these are transient from the refresh engine's point of view:
/// they are retried up to the configured budget, then swallowed into a
/// stale-cache state.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The source could not be reached or answered with an error
    #[error("Fetch failed: {url} - {message}")]
    FetchFailed { url: String, message: String },

    /// HTTP-level errors from the remote tree
    #[error("HTTP error: {status} - {url}")]
    Http { status: u16, url: String },

    /// The source answered but listed no image-like resources
    #[error("Source listing was empty: {url}")]
    EmptyListing { url: String },

    /// Malformed source configuration (bad URL, missing host)
    #[error("Invalid source configuration: {message}")]
    InvalidConfig { message: String },
}

/// Cache state and persistence errors
#[derive(Error, Debug)]
pub enum CacheError {
    /// The cache has never been populated; callers map this to
    /// "service not ready" rather than an empty success
    #[error("Cache is empty - not yet populated")]
    Empty,

    /// No durable mirror exists at the configured path
    #[error("Cache mirror not found: {path}")]
    MirrorNotFound { path: String },

    /// The durable mirror exists but could not be parsed
    #[error("Cache mirror unreadable: {0}")]
    MirrorCorrupt(#[from] serde_json::Error),

    /// Writing the durable mirror failed; logged, never rolls back the
    /// in-memory replace
    #[error("Cache persistence failed: {0}")]
    PersistenceFailed(#[from] std::io::Error),
}

/// Search query errors
#[derive(Error, Debug)]
pub enum SearchError {
    /// A search keyword is required and must be non-empty
    #[error("Search keyword must not be empty")]
    EmptyKeyword,
}

/// Convenience methods for creating common error types
impl AppError {
    /// Create a validation error with a custom message
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an operation in progress error
    pub fn operation_in_progress<S: Into<String>>(operation: S) -> Self {
        Self::OperationInProgress {
            operation: operation.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl SourceError {
    /// Create a fetch failure error
    pub fn fetch_failed<U: Into<String>, M: Into<String>>(url: U, message: M) -> Self {
        Self::FetchFailed {
            url: url.into(),
            message: message.into(),
        }
    }
}
