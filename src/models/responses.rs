//! Response DTOs for the cache server API
//!
//! Defines the structure of outgoing HTTP response bodies. The prefix,
//! size-bucket and cost-benefit reports are deliberately *not* modeled
//! here: they are fixed-format plain text with their own framing.

use serde::Serialize;

/// Response body for the GET operation (GET /get/:key)
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    /// The requested key
    pub key: String,
    /// The stored value
    pub value: String,
}

impl GetResponse {
    /// Creates a new GetResponse
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Response body for the SET operation (PUT /set)
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// The key that was set
    pub key: String,
}

impl SetResponse {
    /// Creates a new SetResponse
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            key,
        }
    }
}

/// Response body for the DELETE operation (DELETE /del/:key)
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The key that was deleted
    pub key: String,
}

impl DeleteResponse {
    /// Creates a new DeleteResponse
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' deleted successfully", key),
            key,
        }
    }
}

/// Response body for the JSON stats summary (GET /stats)
///
/// The detailed per-prefix report lives at GET /stats/prefixes as plain
/// text; this summary only says how much is being tracked.
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Current number of entries in the cache
    pub entries: usize,
    /// Number of distinct key prefixes with statistics (wildcard excluded)
    pub tracked_prefixes: usize,
    /// The delimiter the server splits keys on
    pub prefix_delimiter: String,
}

impl StatsResponse {
    /// Creates a new StatsResponse
    pub fn new(entries: usize, tracked_prefixes: usize, prefix_delimiter: u8) -> Self {
        Self {
            entries,
            tracked_prefixes,
            prefix_delimiter: (prefix_delimiter as char).to_string(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
