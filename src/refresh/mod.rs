//! Periodic cache refresh engine
//!
//! One refresh cycle fetches the remote tree (with bounded, fixed-backoff
//! retries) and atomically installs a non-empty result into the cache.
//! A cycle that exhausts its budget leaves the previous snapshot in
//! place: staleness is preferred over data loss, and a failed refresh is
//! never fatal to the process.
//!
//! Scheduling is a fixed-period ticker. At most one refresh is active at
//! a time: the in-flight guard is taken non-blockingly, so a tick (or a
//! manual trigger) that arrives mid-refresh is skipped rather than queued.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::cache::CacheStore;
use crate::config::CacheConfig;
use crate::errors::{AppError, AppResult, SourceError};
use crate::sources::ImageFetcher;
use crate::utils::{with_retry, RetryConfig};

pub struct RefreshService {
    fetcher: Arc<dyn ImageFetcher>,
    cache: Arc<CacheStore>,
    retry: RetryConfig,
    interval: Duration,
    in_flight: Mutex<()>,
}

impl RefreshService {
    pub fn new(fetcher: Arc<dyn ImageFetcher>, cache: Arc<CacheStore>, config: &CacheConfig) -> Self {
        Self {
            fetcher,
            cache,
            retry: RetryConfig {
                max_attempts: config.max_retries,
                backoff: config.retry_backoff,
            },
            interval: config.refresh_interval,
            in_flight: Mutex::new(()),
        }
    }

    /// Execute one refresh cycle
    ///
    /// Returns the number of records installed, or
    /// `AppError::OperationInProgress` when another cycle holds the
    /// guard. Fetch errors surface as `AppError::Source` after the retry
    /// budget is spent; the cache is left untouched in that case.
    pub async fn run_once(&self) -> AppResult<usize> {
        let _guard = self
            .in_flight
            .try_lock()
            .map_err(|_| AppError::operation_in_progress("catalog refresh"))?;

        let source_desc = self.fetcher.describe();
        let source = source_desc.clone();
        let fetcher = self.fetcher.clone();
        let records = with_retry(
            &self.retry,
            move || {
                let fetcher = fetcher.clone();
                let source = source.clone();
                async move {
                    let records = fetcher.fetch().await?;
                    // An empty listing counts as a failed attempt: never
                    // replace a populated snapshot with nothing.
                    if records.is_empty() {
                        return Err(SourceError::EmptyListing { url: source });
                    }
                    Ok(records)
                }
            },
            "catalog fetch",
        )
        .await?;

        let count = records.len();
        self.cache.replace(records).await;
        info!("Refresh installed {} records from {}", count, source_desc);
        Ok(count)
    }

    /// Run refresh cycles on the configured period until cancelled
    ///
    /// The first tick fires immediately, so the startup refresh happens
    /// here as well. Ticks that fall due while a cycle is still running
    /// are skipped.
    pub async fn start(self: Arc<Self>, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(
            "Refresh scheduler started: every {} from {}",
            humantime::format_duration(self.interval),
            self.fetcher.describe()
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    match self.run_once().await {
                        Ok(count) => debug!("Refresh cycle completed with {} records", count),
                        Err(AppError::OperationInProgress { .. }) => {
                            debug!("Refresh still in flight - tick skipped");
                        }
                        Err(e) => error!("Refresh cycle failed, serving previous snapshot: {}", e),
                    }
                }
                _ = cancel.cancelled() => {
                    info!("Refresh scheduler shutting down");
                    break;
                }
            }
        }
    }
}
