//! Background Tasks Module
//!
//! Contains background tasks that run periodically during server operation.
//!
//! # Tasks
//! - Cache refresh: reloads the most recent orders into the cache

mod refresh;

pub use refresh::spawn_refresh_task;
