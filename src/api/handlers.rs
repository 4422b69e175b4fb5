//! API Handlers
//!
//! HTTP request handlers for the order lookup endpoints.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::cache::BoundedCache;
use crate::error::{OrderError, Result};
use crate::ingest::validate_order;
use crate::models::{CreateResponse, HealthResponse, Order, StatsResponse};
use crate::repository::OrderRepository;
use crate::service::{OrderResolver, OrderService, ResolverSettings};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Read-through order service
    pub service: Arc<dyn OrderService>,
    /// Cache behind the service, read directly for statistics
    pub cache: Arc<BoundedCache>,
}

impl AppState {
    pub fn new(service: Arc<dyn OrderService>, cache: Arc<BoundedCache>) -> Self {
        Self { service, cache }
    }

    /// Builds the cache and resolver described by `config` on top of `repo`.
    pub fn from_config(config: &crate::config::Config, repo: Arc<dyn OrderRepository>) -> Self {
        let cache = Arc::new(BoundedCache::new(config.cache_capacity));
        let resolver = OrderResolver::new(repo, cache.clone(), ResolverSettings::from(config));
        Self::new(Arc::new(resolver), cache)
    }
}

/// Handler for GET /order/:order_uid
pub async fn get_order_handler(
    State(state): State<AppState>,
    Path(order_uid): Path<String>,
) -> Result<Json<Order>> {
    let order = state.service.get(&order_uid).await?;
    Ok(Json(order.as_ref().clone()))
}

/// Handler for POST /order
///
/// The body is decoded by hand so a malformed document is reported the same
/// way as a structurally invalid one.
pub async fn create_order_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<CreateResponse>)> {
    let order: Order =
        serde_json::from_slice(&body).map_err(|e| OrderError::InvalidPayload(e.to_string()))?;
    validate_order(&order)?;

    state.service.create(&order).await?;
    info!(order_uid = %order.order_uid, "order stored via http");

    Ok((
        StatusCode::CREATED,
        Json(CreateResponse::new(order.order_uid)),
    ))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.cache.stats().await;
    Json(StatsResponse::new(&stats, state.cache.capacity()))
}

/// Handler for GET /healthz
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
