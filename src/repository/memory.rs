//! In-memory order repository
//!
//! Keeps every order behind one lock so an upsert swaps delivery, payment and
//! the full item list in a single step.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::OrderRepository;
use crate::error::{OrderError, Result};
use crate::models::Order;

#[derive(Debug, Default)]
pub struct InMemoryRepository {
    orders: RwLock<HashMap<String, Order>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored orders.
    pub async fn len(&self) -> usize {
        self.orders.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.orders.read().await.is_empty()
    }
}

#[async_trait]
impl OrderRepository for InMemoryRepository {
    async fn get_order(&self, id: &str) -> Result<Order> {
        self.orders
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| OrderError::NotFound(id.to_string()))
    }

    async fn get_recent(&self, limit: usize) -> Result<Vec<Order>> {
        let orders = self.orders.read().await;
        let mut recent: Vec<Order> = orders.values().cloned().collect();
        recent.sort_by(|a, b| b.date_created.cmp(&a.date_created));
        recent.truncate(limit);
        Ok(recent)
    }

    async fn upsert_order(&self, order: &Order) -> Result<()> {
        if order.order_uid.is_empty() {
            return Err(OrderError::Store(
                "order_uid violates not-null constraint".to_string(),
            ));
        }
        let replaced = self
            .orders
            .write()
            .await
            .insert(order.order_uid.clone(), order.clone());
        debug!(
            order_uid = %order.order_uid,
            updated = replaced.is_some(),
            items = order.items.len(),
            "order upserted"
        );
        Ok(())
    }
}
