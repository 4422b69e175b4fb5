//! Repository Module
//!
//! Read/write contract to durable order storage. The service layer only ever
//! talks to storage through [`OrderRepository`].

mod memory;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Order;

pub use memory::InMemoryRepository;

/// Durable order storage.
#[async_trait]
pub trait OrderRepository: Send + Sync + 'static {
    /// Loads an order with its delivery, payment and items.
    ///
    /// Fails with [`OrderError::NotFound`](crate::error::OrderError::NotFound)
    /// when no order has this id.
    async fn get_order(&self, id: &str) -> Result<Order>;

    /// Returns up to `limit` orders, newest `date_created` first.
    async fn get_recent(&self, limit: usize) -> Result<Vec<Order>>;

    /// Inserts or updates an order. The stored item list is replaced as a whole.
    async fn upsert_order(&self, order: &Order) -> Result<()>;
}
