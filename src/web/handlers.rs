//! HTTP request handlers
//!
//! Thin handlers over the query surface: they take a snapshot reference
//! from the cache and delegate to the stateless search functions. None of
//! them touch the fetch path; a refresh in progress is invisible here
//! beyond serving the pre-refresh snapshot.

use axum::extract::{Query, State};
use axum::response::Response;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::errors::CacheError;
use crate::search;
use crate::web::responses::{handle_error, handle_result, ok, CacheHealth, HealthResponse};
use crate::web::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub keyword: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct RandomParams {
    pub count: Option<usize>,
}

/// Full catalog listing
///
/// An unpopulated cache maps to "not ready" rather than an empty success.
pub async fn list_images(State(state): State<AppState>) -> Response {
    let snapshot = state.cache.snapshot().await;
    if snapshot.is_empty() {
        return handle_error(CacheError::Empty.into());
    }
    ok(&snapshot.images)
}

/// Ranked search over the current snapshot
pub async fn search_images(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let keyword = params.keyword.unwrap_or_default();
    let limit = params.limit.unwrap_or(state.config.search.default_limit);

    let snapshot = state.cache.snapshot().await;
    debug!(
        "Searching {} records for keyword '{}' (limit {})",
        snapshot.len(),
        keyword,
        limit
    );

    handle_result(search::search(&snapshot, &keyword, limit).map_err(Into::into))
}

/// Random sample from the current snapshot
pub async fn random_images(
    State(state): State<AppState>,
    Query(params): Query<RandomParams>,
) -> Response {
    let count = params
        .count
        .unwrap_or(state.config.search.default_random_count);

    let snapshot = state.cache.snapshot().await;
    ok(search::random_sample(&snapshot, count))
}

/// Size of the current snapshot
pub async fn count_images(State(state): State<AppState>) -> Response {
    let count = state.cache.len().await;
    ok(json!({ "count": count }))
}

/// Manually trigger a refresh cycle
///
/// Shares the scheduler's overlap guard: a cycle already in flight
/// answers 409 instead of queueing a second fetch.
pub async fn trigger_refresh(State(state): State<AppState>) -> Response {
    handle_result(
        state
            .refresh
            .run_once()
            .await
            .map(|installed| json!({ "installed": installed })),
    )
}

/// Health check endpoint
///
/// Always 200 while the process runs; cache emptiness is reported in the
/// payload, not as an error. A stale or empty cache is a degraded state,
/// not an outage.
pub async fn health_check(State(state): State<AppState>) -> Response {
    let snapshot = state.cache.snapshot().await;
    let populated = !snapshot.is_empty();

    ok(HealthResponse {
        status: if populated { "healthy" } else { "starting" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: (chrono::Utc::now() - state.start_time).num_seconds(),
        cache: CacheHealth {
            populated,
            records: snapshot.len(),
            fetched_at: populated.then_some(snapshot.fetched_at),
        },
    })
}
