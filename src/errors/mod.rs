//! Centralized error handling for the image catalog service
//!
//! This module provides the error types used across all application
//! layers. Errors are organized by layer (source, cache, search) with a
//! top-level `AppError` umbrella. No error condition here is fatal to the
//! process: the service degrades to serving a stale or empty cache
//! rather than crashing.

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for source-layer Results
pub type SourceResult<T> = Result<T, SourceError>;

/// Convenience type alias for cache-layer Results
pub type CacheResult<T> = Result<T, CacheError>;
