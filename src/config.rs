//! Configuration Module
//!
//! Loads service settings from environment variables.

use std::env;
use std::str::FromStr;

/// Service configuration parameters.
///
/// Every value can be set via an environment variable; unset or unparsable
/// variables fall back to the defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of orders held in the cache
    pub cache_capacity: usize,
    /// Number of most recent orders loaded when warming the cache
    pub cache_warm_limit: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Deadline for durable-store reads, in milliseconds
    pub read_timeout_ms: u64,
    /// Deadline for durable-store writes, in milliseconds
    pub write_timeout_ms: u64,
    /// Topic the ingestion loop consumes
    pub source_topic: String,
    /// Dead-letter topic; `None` disables dead-lettering
    pub dead_letter_topic: Option<String>,
    /// Cache refresh interval in seconds; 0 disables the periodic refresh
    pub refresh_interval: u64,
    /// Capacity of the in-process message channels
    pub channel_capacity: usize,
    /// Number of sample orders published at startup
    pub demo_orders: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Cached orders (default: 10)
    /// - `CACHE_WARM_LIMIT` - Orders loaded on warm-up (default: 10)
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `READ_TIMEOUT_MS` - Store read deadline (default: 2000)
    /// - `WRITE_TIMEOUT_MS` - Store write deadline (default: 3000)
    /// - `SOURCE_TOPIC` - Inbound topic (default: orders)
    /// - `DLQ_TOPIC` - Dead-letter topic, empty to disable (default: orders.DLQ)
    /// - `REFRESH_INTERVAL` - Cache refresh period in seconds, 0 to disable (default: 60)
    /// - `CHANNEL_CAPACITY` - Channel buffer size (default: 1024)
    /// - `DEMO_ORDERS` - Sample orders published at startup (default: 0)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let dead_letter_topic = match env::var("DLQ_TOPIC") {
            Ok(topic) if topic.trim().is_empty() => None,
            Ok(topic) => Some(topic),
            Err(_) => defaults.dead_letter_topic,
        };

        Self {
            cache_capacity: parse_var("CACHE_CAPACITY", defaults.cache_capacity),
            cache_warm_limit: parse_var("CACHE_WARM_LIMIT", defaults.cache_warm_limit),
            server_port: parse_var("SERVER_PORT", defaults.server_port),
            read_timeout_ms: parse_var("READ_TIMEOUT_MS", defaults.read_timeout_ms),
            write_timeout_ms: parse_var("WRITE_TIMEOUT_MS", defaults.write_timeout_ms),
            source_topic: env::var("SOURCE_TOPIC")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.source_topic),
            dead_letter_topic,
            refresh_interval: parse_var("REFRESH_INTERVAL", defaults.refresh_interval),
            channel_capacity: parse_var("CHANNEL_CAPACITY", defaults.channel_capacity),
            demo_orders: parse_var("DEMO_ORDERS", defaults.demo_orders),
        }
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_capacity: crate::cache::DEFAULT_CAPACITY,
            cache_warm_limit: 10,
            server_port: 8080,
            read_timeout_ms: 2000,
            write_timeout_ms: 3000,
            source_topic: "orders".to_string(),
            dead_letter_topic: Some("orders.DLQ".to_string()),
            refresh_interval: 60,
            channel_capacity: 1024,
            demo_orders: 0,
        }
    }
}
