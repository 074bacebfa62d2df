//! Core data models shared across the application
//!
//! The catalog deals in three value types: the raw `ImageRecord` as it
//! arrives from a source tree, the immutable `Snapshot` the cache serves
//! reads from, and the `ScoredImage` produced by search ranking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single image entry in the catalog
///
/// Records are immutable once constructed; two records are equal iff both
/// name and URL are equal. `name` is the file basename including its
/// extension, `url` an absolute resource locator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    pub name: String,
    pub url: String,
}

impl ImageRecord {
    pub fn new<N: Into<String>, U: Into<String>>(name: N, url: U) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// An immutable, timestamped view of the catalog at one instant
///
/// A snapshot is never mutated in place. Refresh produces a new snapshot
/// that atomically replaces the old one, so readers holding an
/// `Arc<Snapshot>` always see a fully consistent record list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub images: Vec<ImageRecord>,
    pub fetched_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(images: Vec<ImageRecord>) -> Self {
        Self {
            images,
            fetched_at: Utc::now(),
        }
    }

    /// The never-populated state the cache starts in
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// An image record paired with its search relevance score
///
/// Produced only by the search path, never persisted. Scores are in
/// `[0.0, 1.0]`; substring matches are pinned at 1.0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredImage {
    pub name: String,
    pub url: String,
    pub score: f64,
}

impl ScoredImage {
    pub fn new(record: &ImageRecord, score: f64) -> Self {
        Self {
            name: record.name.clone(),
            url: record.url.clone(),
            score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_equality_is_field_wise() {
        let a = ImageRecord::new("cat.png", "https://example.com/cat.png");
        let b = ImageRecord::new("cat.png", "https://example.com/cat.png");
        let c = ImageRecord::new("cat.png", "https://example.com/other/cat.png");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn empty_snapshot_has_no_records() {
        let snapshot = Snapshot::empty();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.len(), 0);
    }
}
