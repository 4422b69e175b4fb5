//! Response DTOs for the order service API
//!
//! Defines the structure of outgoing HTTP response bodies other than the
//! order itself, which is served in its wire shape.

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for POST /order
#[derive(Debug, Clone, Serialize)]
pub struct CreateResponse {
    /// Success message
    pub message: String,
    /// The order that was stored
    pub order_uid: String,
}

impl CreateResponse {
    /// Creates a new CreateResponse
    pub fn new(order_uid: impl Into<String>) -> Self {
        let order_uid = order_uid.into();
        Self {
            message: format!("Order '{}' stored successfully", order_uid),
            order_uid,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of FIFO evictions
    pub evictions: u64,
    /// Number of in-place value replacements
    pub updates: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Fixed cache capacity
    pub capacity: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from a cache statistics snapshot
    pub fn new(stats: &CacheStats, capacity: usize) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            updates: stats.updates,
            total_entries: stats.total_entries,
            capacity,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /healthz)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status ("ok")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
