//! Order Cache - order lookup and ingestion service
//!
//! Serves orders from a bounded FIFO cache in front of durable storage,
//! coalescing concurrent misses, and ingests orders from a message topic with
//! dead-lettering of anything it cannot process.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod ingest;
pub mod models;
pub mod producer;
pub mod repository;
pub mod service;
pub mod tasks;

pub use api::{create_router, AppState};
pub use cache::BoundedCache;
pub use config::Config;
pub use error::{OrderError, Result};
pub use ingest::IngestionLoop;
pub use repository::{InMemoryRepository, OrderRepository};
pub use service::{OrderResolver, OrderService};
pub use tasks::spawn_refresh_task;
