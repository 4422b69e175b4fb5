//! Order Resolver
//!
//! Cache-aside reads with coalesced misses, plus the write and warm-up paths.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::timeout;
use tracing::{debug, info};

use super::{InflightRegistry, OrderService};
use crate::cache::BoundedCache;
use crate::config::Config;
use crate::error::{OrderError, Result};
use crate::models::Order;
use crate::repository::OrderRepository;

/// Deadlines and sizes the resolver applies to store calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverSettings {
    /// Deadline for `get_order` and `get_recent`
    pub read_timeout: Duration,
    /// Deadline for `upsert_order`
    pub write_timeout: Duration,
    /// How many recent orders `update_cache` loads
    pub warm_limit: usize,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            read_timeout: Duration::from_secs(2),
            write_timeout: Duration::from_secs(3),
            warm_limit: 10,
        }
    }
}

impl From<&Config> for ResolverSettings {
    fn from(config: &Config) -> Self {
        Self {
            read_timeout: Duration::from_millis(config.read_timeout_ms),
            write_timeout: Duration::from_millis(config.write_timeout_ms),
            warm_limit: config.cache_warm_limit,
        }
    }
}

/// Read-through order service over a repository and a bounded cache.
pub struct OrderResolver {
    repo: Arc<dyn OrderRepository>,
    cache: Arc<BoundedCache>,
    inflight: InflightRegistry<Result<Arc<Order>>>,
    settings: ResolverSettings,
}

impl OrderResolver {
    pub fn new(
        repo: Arc<dyn OrderRepository>,
        cache: Arc<BoundedCache>,
        settings: ResolverSettings,
    ) -> Self {
        Self {
            repo,
            cache,
            inflight: InflightRegistry::new(),
            settings,
        }
    }

    pub fn cache(&self) -> &Arc<BoundedCache> {
        &self.cache
    }

    /// Store fetch run by the coalescing leader. Fills the cache before the
    /// result is handed to the other waiters.
    async fn fetch_and_cache(&self, id: &str) -> Result<Arc<Order>> {
        // An earlier leader may have filled the cache since our miss
        if let Some(order) = self.cache.peek(id).await {
            return Ok(order);
        }

        let order = timeout(self.settings.read_timeout, self.repo.get_order(id))
            .await
            .map_err(|_| {
                OrderError::Timeout(format!(
                    "get_order({}) exceeded {:?}",
                    id, self.settings.read_timeout
                ))
            })??;
        let order = Arc::new(order);

        self.cache.set(id, Arc::clone(&order)).await;
        debug!(order_uid = %id, "order loaded from store");
        Ok(order)
    }
}

#[async_trait]
impl OrderService for OrderResolver {
    async fn get(&self, id: &str) -> Result<Arc<Order>> {
        if let Some(order) = self.cache.get(id).await {
            return Ok(order);
        }
        self.inflight.run(id, || self.fetch_and_cache(id)).await
    }

    async fn create(&self, order: &Order) -> Result<()> {
        timeout(self.settings.write_timeout, self.repo.upsert_order(order))
            .await
            .map_err(|_| {
                OrderError::Timeout(format!(
                    "upsert_order({}) exceeded {:?}",
                    order.order_uid, self.settings.write_timeout
                ))
            })?
    }

    async fn update_cache(&self) -> Result<usize> {
        let limit = self.settings.warm_limit;
        let orders = timeout(self.settings.read_timeout, self.repo.get_recent(limit))
            .await
            .map_err(|_| {
                OrderError::Timeout(format!(
                    "get_recent({}) exceeded {:?}",
                    limit, self.settings.read_timeout
                ))
            })??;

        let count = orders.len();
        for order in orders {
            let key = order.order_uid.clone();
            self.cache.set(key, Arc::new(order)).await;
        }
        info!(count, "cache primed with recent orders");
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Item;
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tokio_test::{assert_err, assert_ok};

    /// Repository double that counts fetches and can stall or fail them.
    #[derive(Default)]
    struct CountingRepo {
        orders: Mutex<HashMap<String, Order>>,
        fetches: AtomicUsize,
        delay: Duration,
        fail_with: Option<OrderError>,
    }

    impl CountingRepo {
        fn with(orders: Vec<Order>) -> Self {
            Self {
                orders: Mutex::new(
                    orders
                        .into_iter()
                        .map(|o| (o.order_uid.clone(), o))
                        .collect(),
                ),
                ..Self::default()
            }
        }

        fn fetches(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl OrderRepository for CountingRepo {
        async fn get_order(&self, id: &str) -> Result<Order> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            if let Some(err) = &self.fail_with {
                return Err(err.clone());
            }
            self.orders
                .lock()
                .unwrap()
                .get(id)
                .cloned()
                .ok_or_else(|| OrderError::NotFound(id.to_string()))
        }

        async fn get_recent(&self, limit: usize) -> Result<Vec<Order>> {
            let mut all: Vec<Order> = self.orders.lock().unwrap().values().cloned().collect();
            all.sort_by(|a, b| b.date_created.cmp(&a.date_created));
            all.truncate(limit);
            Ok(all)
        }

        async fn upsert_order(&self, order: &Order) -> Result<()> {
            tokio::time::sleep(self.delay).await;
            if let Some(err) = &self.fail_with {
                return Err(err.clone());
            }
            self.orders
                .lock()
                .unwrap()
                .insert(order.order_uid.clone(), order.clone());
            Ok(())
        }
    }

    fn order(uid: &str, hour: u32) -> Order {
        Order {
            order_uid: uid.to_string(),
            track_number: "TRK001".to_string(),
            date_created: Utc.with_ymd_and_hms(2024, 5, 1, hour, 0, 0).unwrap(),
            items: vec![Item::default()],
            ..Order::default()
        }
    }

    fn resolver(repo: Arc<CountingRepo>, capacity: usize) -> OrderResolver {
        OrderResolver::new(
            repo,
            Arc::new(BoundedCache::new(capacity)),
            ResolverSettings::default(),
        )
    }

    #[tokio::test]
    async fn test_get_cache_hit_skips_store() {
        let repo = Arc::new(CountingRepo::default());
        let svc = resolver(repo.clone(), 10);
        let expected = Arc::new(order("123", 1));
        svc.cache().set("123", expected.clone()).await;

        let got = svc.get("123").await.unwrap();

        assert!(Arc::ptr_eq(&got, &expected));
        assert_eq!(repo.fetches(), 0);
    }

    #[tokio::test]
    async fn test_get_miss_fetches_then_caches() {
        let repo = Arc::new(CountingRepo::with(vec![order("b1", 1)]));
        let svc = resolver(repo.clone(), 10);

        let first = svc.get("b1").await.unwrap();
        let second = svc.get("b1").await.unwrap();

        assert_eq!(first.order_uid, "b1");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(repo.fetches(), 1);
        assert_eq!(svc.cache().keys().await, vec!["b1"]);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found_without_caching() {
        let repo = Arc::new(CountingRepo::default());
        let svc = resolver(repo.clone(), 10);

        let result = svc.get("missing-id").await;

        assert_eq!(result, Err(OrderError::NotFound("missing-id".to_string())));
        assert!(svc.cache().is_empty().await);

        // Not negatively cached: the next call asks the store again
        assert_err!(svc.get("missing-id").await);
        assert_eq!(repo.fetches(), 2);
    }

    #[tokio::test]
    async fn test_get_surfaces_store_error_unchanged() {
        let repo = Arc::new(CountingRepo {
            fail_with: Some(OrderError::Store("connection reset".to_string())),
            ..CountingRepo::default()
        });
        let svc = resolver(repo, 10);

        let result = svc.get("b1").await;
        assert_eq!(result, Err(OrderError::Store("connection reset".to_string())));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_misses_share_one_fetch() {
        let repo = Arc::new(CountingRepo {
            delay: Duration::from_millis(100),
            ..CountingRepo::with(vec![order("cold", 1)])
        });
        let svc = Arc::new(resolver(repo.clone(), 10));
        let mut handles = Vec::new();

        for _ in 0..20 {
            let svc = svc.clone();
            handles.push(tokio::spawn(async move { svc.get("cold").await }));
        }

        let mut results = Vec::new();
        for handle in handles {
            results.push(handle.await.unwrap().unwrap());
        }

        assert_eq!(repo.fetches(), 1);
        assert!(results.iter().all(|o| Arc::ptr_eq(o, &results[0])));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_misses_share_one_error() {
        let repo = Arc::new(CountingRepo {
            delay: Duration::from_millis(100),
            ..CountingRepo::default()
        });
        let svc = Arc::new(resolver(repo.clone(), 10));
        let mut handles = Vec::new();

        for _ in 0..10 {
            let svc = svc.clone();
            handles.push(tokio::spawn(async move { svc.get("ghost").await }));
        }

        for handle in handles {
            let result = handle.await.unwrap();
            assert_eq!(result, Err(OrderError::NotFound("ghost".to_string())));
        }
        assert_eq!(repo.fetches(), 1);
    }

    #[tokio::test]
    async fn test_get_times_out_on_slow_store() {
        let repo = Arc::new(CountingRepo {
            delay: Duration::from_millis(500),
            ..CountingRepo::with(vec![order("slow", 1)])
        });
        let svc = OrderResolver::new(
            repo,
            Arc::new(BoundedCache::new(10)),
            ResolverSettings {
                read_timeout: Duration::from_millis(50),
                ..ResolverSettings::default()
            },
        );

        let result = svc.get("slow").await;
        assert!(matches!(result, Err(OrderError::Timeout(_))));
        assert!(svc.cache().is_empty().await);
    }

    #[tokio::test]
    async fn test_create_writes_store_not_cache() {
        let repo = Arc::new(CountingRepo::default());
        let svc = resolver(repo.clone(), 10);

        assert_ok!(svc.create(&order("b7", 1)).await);

        assert!(svc.cache().is_empty().await);
        assert_eq!(svc.get("b7").await.unwrap().order_uid, "b7");
        assert_eq!(repo.fetches(), 1);
    }

    #[tokio::test]
    async fn test_create_surfaces_store_error() {
        let repo = Arc::new(CountingRepo {
            fail_with: Some(OrderError::Store("unique violation".to_string())),
            ..CountingRepo::default()
        });
        let svc = resolver(repo, 10);

        let result = svc.create(&order("b1", 1)).await;
        assert_eq!(result, Err(OrderError::Store("unique violation".to_string())));
    }

    #[tokio::test]
    async fn test_update_cache_primes_recent_orders() {
        let repo = Arc::new(CountingRepo::with(vec![order("b1", 1), order("b2", 2)]));
        let svc = resolver(repo.clone(), 10);

        let primed = svc.update_cache().await.unwrap();

        assert_eq!(primed, 2);
        let mut keys = svc.cache().keys().await;
        keys.sort();
        assert_eq!(keys, vec!["b1", "b2"]);
        assert_eq!(repo.fetches(), 0);
    }

    #[tokio::test]
    async fn test_update_cache_primes_orders_with_long_ids() {
        let long_id = "x".repeat(300);
        let repo = Arc::new(CountingRepo::with(vec![order(&long_id, 3), order("b1", 1)]));
        let svc = resolver(repo, 10);

        let primed = svc.update_cache().await.unwrap();

        assert_eq!(primed, 2);
        assert_eq!(svc.cache().keys().await, vec![long_id, "b1".to_string()]);
    }
}
