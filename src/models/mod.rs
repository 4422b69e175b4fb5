//! Domain and response models for the order service
//!
//! `order` holds the wire representation shared by message payloads and HTTP
//! responses; `responses` holds the small bodies returned by the API.

pub mod order;
pub mod responses;

// Re-export commonly used types
pub use order::{Delivery, Item, Order, Payment};
pub use responses::{CreateResponse, HealthResponse, StatsResponse};
