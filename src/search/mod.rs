//! Stateless search and sampling over a catalog snapshot
//!
//! Ranking works on two mutually exclusive buckets: records whose name
//! contains the keyword as a case-insensitive substring (score pinned at
//! 1.0), and records admitted by edit-distance similarity. A non-empty
//! contains-bucket always wins outright; the buckets are never merged and
//! scores are never blended across them.

pub mod similarity;

use std::cmp::Ordering;

use rand::seq::SliceRandom;

use crate::errors::SearchError;
use crate::models::{ImageRecord, ScoredImage, Snapshot};
use similarity::similarity;

/// Minimum similarity a record needs to enter the fuzzy bucket
const FUZZY_SCORE_FLOOR: f64 = 0.3;

/// Rank a snapshot's records against a query keyword
///
/// Returns at most `limit` results sorted by score descending; ties keep
/// their snapshot order. An empty keyword is rejected before any record
/// is examined.
pub fn search(
    snapshot: &Snapshot,
    keyword: &str,
    limit: usize,
) -> Result<Vec<ScoredImage>, SearchError> {
    if keyword.is_empty() {
        return Err(SearchError::EmptyKeyword);
    }

    let keyword_lower = keyword.to_lowercase();

    let mut contains_bucket = Vec::new();
    let mut fuzzy_bucket = Vec::new();

    for record in &snapshot.images {
        if record.name.to_lowercase().contains(&keyword_lower) {
            contains_bucket.push(ScoredImage::new(record, 1.0));
        } else {
            let score = similarity(keyword, &record.name);
            if score > FUZZY_SCORE_FLOOR {
                fuzzy_bucket.push(ScoredImage::new(record, score));
            }
        }
    }

    let mut results = if contains_bucket.is_empty() {
        fuzzy_bucket
    } else {
        contains_bucket
    };

    // sort_by is stable, so equal scores retain snapshot order
    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    results.truncate(limit);

    Ok(results)
}

/// Draw up to `count` distinct records from the snapshot in random order
///
/// Shuffles a copy; the snapshot itself is never mutated.
pub fn random_sample(snapshot: &Snapshot, count: usize) -> Vec<ImageRecord> {
    let mut shuffled = snapshot.images.clone();
    shuffled.shuffle(&mut rand::rng());
    shuffled.truncate(count);
    shuffled
}
