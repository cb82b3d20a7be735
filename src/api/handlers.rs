//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint. The statistics
//! report handlers hand out the engine's plain-text dumps verbatim; all
//! framing (field order, `END\r\n` terminator) is owned by the engine.

use std::sync::Arc;
use tokio::sync::RwLock;

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::cache::CacheStore;
use crate::error::{CacheError, Result};
use crate::models::{
    DeleteResponse, GetResponse, HealthResponse, SetRequest, SetResponse, StatsResponse,
};
use crate::stats::CoarseClock;

/// Application state shared across all handlers.
///
/// One lock guards the store *and* the stats engine it owns: every
/// recording call, report render and clear runs for its full duration
/// under this single exclusive lock.
#[derive(Clone)]
pub struct AppState {
    /// Thread-safe cache store (stats engine included)
    pub cache: Arc<RwLock<CacheStore>>,
    /// Shared coarse clock, ticked by a background task
    pub clock: Arc<CoarseClock>,
}

impl AppState {
    /// Creates a new AppState around an existing store, sharing the clock
    /// its stats engine was built with.
    pub fn new(cache: CacheStore) -> Self {
        let clock = cache.stats().clock().clone();
        Self {
            cache: Arc::new(RwLock::new(cache)),
            clock,
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &crate::config::Config) -> Self {
        let clock = Arc::new(CoarseClock::new());
        let stats = crate::stats::PrefixStats::new(config.prefix_delimiter, clock.clone());
        let cache = CacheStore::new(config.max_entries, config.default_ttl, stats);
        Self {
            cache: Arc::new(RwLock::new(cache)),
            clock,
        }
    }
}

/// Content type of the fixed-format statistics reports.
const TEXT_PLAIN: (header::HeaderName, &str) = (header::CONTENT_TYPE, "text/plain; charset=utf-8");

/// Handler for PUT /set
///
/// Stores a key-value pair in the cache with optional TTL.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let mut cache = state.cache.write().await;
    cache.set(req.key.clone(), req.value, req.ttl)?;

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /get/:key
///
/// Retrieves a value from the cache by key.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    // Write lock: LRU touch and stats recording mutate the store.
    let mut cache = state.cache.write().await;
    let value = cache.get(&key)?;

    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for DELETE /del/:key
///
/// Deletes a key from the cache.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let mut cache = state.cache.write().await;
    cache.delete(&key)?;

    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for GET /stats
///
/// Returns a JSON summary of what the server currently tracks.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache.read().await;

    Json(StatsResponse::new(
        cache.len(),
        cache.stats().num_prefixes(),
        cache.stats().delimiter(),
    ))
}

/// Handler for GET /stats/prefixes
///
/// Renders the full per-prefix statistics report as plain text. An absent
/// report (buffer allocation failure) maps to 503, never a partial body.
pub async fn prefix_report_handler(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let mut cache = state.cache.write().await;
    let report = cache.stats_mut().dump().ok_or_else(|| {
        CacheError::StatsUnavailable("prefix report buffer could not be allocated".to_string())
    })?;

    Ok(([TEXT_PLAIN], report))
}

/// Handler for DELETE /stats/prefixes
///
/// Drops every prefix record and zeroes the wildcard and histograms.
pub async fn clear_stats_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    let mut cache = state.cache.write().await;
    cache.stats_mut().clear();

    Json(json!({ "message": "Prefix statistics cleared" }))
}

/// Handler for GET /stats/sizes
///
/// Renders the object-size histogram as plain text.
pub async fn size_report_handler(State(state): State<AppState>) -> impl IntoResponse {
    let cache = state.cache.read().await;
    ([TEXT_PLAIN], cache.stats().dump_size_buckets())
}

/// Handler for GET /stats/costbenefit
///
/// Renders the cost-benefit histogram as plain text. Needs the write lock:
/// rendering flushes every slot's occupancy integral.
pub async fn cost_benefit_report_handler(State(state): State<AppState>) -> impl IntoResponse {
    let mut cache = state.cache.write().await;
    ([TEXT_PLAIN], cache.stats_mut().dump_cost_benefit())
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
