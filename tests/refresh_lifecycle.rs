//! Refresh engine and warm-start lifecycle tests
//!
//! Covers the full fetch → replace → persist → warm-start path and the
//! scheduler's startup/periodic/shutdown behavior under a paused clock.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use image_catalog::{
    cache::CacheStore,
    config::CacheConfig,
    errors::{SourceError, SourceResult},
    models::ImageRecord,
    refresh::RefreshService,
    sources::ImageFetcher,
};

struct CountingFetcher {
    calls: AtomicU32,
    fail_first: u32,
    records: Vec<ImageRecord>,
}

impl CountingFetcher {
    fn succeeding(records: Vec<ImageRecord>) -> Self {
        Self {
            calls: AtomicU32::new(0),
            fail_first: 0,
            records,
        }
    }

    fn failing_first(fail_first: u32, records: Vec<ImageRecord>) -> Self {
        Self {
            calls: AtomicU32::new(0),
            fail_first,
            records,
        }
    }

    fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ImageFetcher for CountingFetcher {
    async fn fetch(&self) -> SourceResult<Vec<ImageRecord>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.fail_first {
            Err(SourceError::fetch_failed("https://example.com", "down"))
        } else {
            Ok(self.records.clone())
        }
    }

    fn describe(&self) -> String {
        "counting test source".to_string()
    }
}

fn records(names: &[&str]) -> Vec<ImageRecord> {
    names
        .iter()
        .map(|n| ImageRecord::new(*n, format!("https://example.com/{n}")))
        .collect()
}

fn fast_retry_config() -> CacheConfig {
    CacheConfig {
        retry_backoff: Duration::from_millis(1),
        ..CacheConfig::default()
    }
}

#[tokio::test]
async fn refresh_persists_and_a_new_store_warm_starts() {
    let dir = tempfile::tempdir().unwrap();
    let mirror = dir.path().join("mirror.json");
    let expected = records(&["cat.png", "dog.jpg"]);

    {
        let cache = Arc::new(CacheStore::new(Some(mirror.clone())));
        let fetcher = Arc::new(CountingFetcher::succeeding(expected.clone()));
        let service = RefreshService::new(fetcher, cache, &fast_retry_config());
        assert_eq!(service.run_once().await.unwrap(), 2);
    }

    // Simulated restart: a fresh store seeded only from the mirror
    let restarted = CacheStore::new(Some(mirror));
    let loaded = restarted.load_from_mirror().await.unwrap();

    assert_eq!(loaded, 2);
    assert_eq!(restarted.snapshot().await.images, expected);
}

#[tokio::test]
async fn failed_refresh_keeps_warm_started_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let mirror = dir.path().join("mirror.json");
    let seeded = records(&["seeded.png"]);

    {
        let cache = Arc::new(CacheStore::new(Some(mirror.clone())));
        cache.replace(seeded.clone()).await;
    }

    let cache = Arc::new(CacheStore::new(Some(mirror)));
    cache.load_from_mirror().await.unwrap();

    let fetcher = Arc::new(CountingFetcher::failing_first(u32::MAX, vec![]));
    let service = RefreshService::new(fetcher.clone(), cache.clone(), &fast_retry_config());

    assert!(service.run_once().await.is_err());
    assert_eq!(fetcher.call_count(), 3);
    assert_eq!(cache.snapshot().await.images, seeded);
}

#[tokio::test]
async fn recovery_on_final_attempt_replaces_stale_snapshot() {
    let cache = Arc::new(CacheStore::in_memory());
    cache.replace(records(&["stale.png"])).await;

    let fetcher = Arc::new(CountingFetcher::failing_first(2, records(&["fresh.png"])));
    let service = RefreshService::new(fetcher.clone(), cache.clone(), &fast_retry_config());

    assert_eq!(service.run_once().await.unwrap(), 1);
    assert_eq!(fetcher.call_count(), 3);
    assert_eq!(cache.snapshot().await.images, records(&["fresh.png"]));
}

#[tokio::test(start_paused = true)]
async fn scheduler_refreshes_at_startup_then_on_the_period() {
    let cache = Arc::new(CacheStore::in_memory());
    let fetcher = Arc::new(CountingFetcher::succeeding(records(&["tick.png"])));
    let config = CacheConfig {
        refresh_interval: Duration::from_secs(600),
        ..fast_retry_config()
    };
    let service = Arc::new(RefreshService::new(fetcher.clone(), cache.clone(), &config));

    let cancel = CancellationToken::new();
    let handle = tokio::spawn(service.clone().start(cancel.clone()));

    // Startup cycle fires on the immediate first tick
    tokio::time::sleep(Duration::from_millis(10)).await;
    tokio::task::yield_now().await;
    assert_eq!(fetcher.call_count(), 1);
    assert_eq!(cache.len().await, 1);

    // Next cycle fires one period later
    tokio::time::sleep(Duration::from_secs(600)).await;
    tokio::task::yield_now().await;
    assert_eq!(fetcher.call_count(), 2);

    // Cancellation stops the loop
    cancel.cancel();
    handle.await.unwrap();
    assert_eq!(fetcher.call_count(), 2);
}
