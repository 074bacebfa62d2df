//! External source fetchers
//!
//! A source enumerates every image-like resource in a remote tree and
//! yields flat `{name, url}` records. The refresh engine only knows the
//! `ImageFetcher` trait; concrete transports live in submodules.

pub mod github;

use async_trait::async_trait;

use crate::errors::SourceResult;
use crate::models::ImageRecord;

pub use github::GitHubTreeFetcher;

/// A fetcher enumerates the remote tree into a flat record list
///
/// Implementations are stateless per call and idempotent: a failed or
/// abandoned fetch needs no cleanup.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Enumerate all image resources, flattening subdirectories
    async fn fetch(&self) -> SourceResult<Vec<ImageRecord>>;

    /// Human-readable identity of the source, for logs
    fn describe(&self) -> String;
}
