//! API Module
//!
//! HTTP handlers and routing for the order lookup service.
//!
//! # Endpoints
//! - `GET /order/:order_uid` - Fetch an order, cache first
//! - `POST /order` - Validate and store an order
//! - `GET /stats` - Cache statistics
//! - `GET /healthz` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
