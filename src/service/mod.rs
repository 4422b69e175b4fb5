//! Service Module
//!
//! The order service sits between callers (HTTP handlers, the ingestion loop)
//! and durable storage, answering reads from the bounded cache when it can.

mod inflight;
mod resolver;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Order;

pub use inflight::InflightRegistry;
pub use resolver::{OrderResolver, ResolverSettings};

/// Operations exposed to callers of the order service.
#[async_trait]
pub trait OrderService: Send + Sync + 'static {
    /// Returns the order with this id, from cache or from storage.
    async fn get(&self, id: &str) -> Result<Arc<Order>>;

    /// Persists an order. Does not touch the cache.
    async fn create(&self, order: &Order) -> Result<()>;

    /// Loads the most recent orders into the cache and returns how many.
    async fn update_cache(&self) -> Result<usize>;
}
