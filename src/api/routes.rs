//! API Routes
//!
//! Defines the HTTP routes and builds the axum Router. The JSON cache
//! endpoints sit next to the plain-text statistics reports; both share
//! the same application state.

use axum::{
    routing::{delete, get, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::handlers::{
    clear_stats_handler, cost_benefit_report_handler, delete_handler, get_handler, health_handler,
    prefix_report_handler, set_handler, size_report_handler, stats_handler, AppState,
};

/// Creates the application router with all routes configured.
///
/// # Routes
/// - `PUT /set` - Store a key-value pair
/// - `GET /get/:key` - Retrieve a value by key
/// - `DELETE /del/:key` - Delete a key
/// - `GET /stats` - JSON tracking summary
/// - `GET /stats/prefixes` - Per-prefix statistics report (plain text)
/// - `DELETE /stats/prefixes` - Reset all prefix statistics
/// - `GET /stats/sizes` - Object-size histogram (plain text)
/// - `GET /stats/costbenefit` - Cost-benefit histogram (plain text)
/// - `GET /health` - Health check
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/set", put(set_handler))
        .route("/get/:key", get(get_handler))
        .route("/del/:key", delete(delete_handler))
        .route("/stats", get(stats_handler))
        .route(
            "/stats/prefixes",
            get(prefix_report_handler).delete(clear_stats_handler),
        )
        .route("/stats/sizes", get(size_report_handler))
        .route("/stats/costbenefit", get(cost_benefit_report_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_create_router() {
        let state = AppState::from_config(&Config::default());
        let _router = create_router(state);
    }
}
