//! Error types for the order service
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Order Error Enum ==
/// Unified error type for the order service.
///
/// `Clone` so a single coalesced store fetch can hand the same error to every waiter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// No order with this id in durable storage
    #[error("order not found: {0}")]
    NotFound(String),

    /// Structural defects in an order, all of them at once
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// Message payload could not be decoded into an order
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// Backing store failure (I/O, constraint violation)
    #[error("store error: {0}")]
    Store(String),

    /// Backing store call exceeded its deadline
    #[error("timed out: {0}")]
    Timeout(String),

    /// Dead-letter write failed
    #[error("dead-letter write failed: {0}")]
    DeadLetter(String),

    /// Message source failed or was closed
    #[error("message source error: {0}")]
    Source(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for OrderError {
    fn into_response(self) -> Response {
        let status = match &self {
            OrderError::NotFound(_) => StatusCode::NOT_FOUND,
            OrderError::Validation(_) => StatusCode::BAD_REQUEST,
            OrderError::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            OrderError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            OrderError::Source(_) => StatusCode::SERVICE_UNAVAILABLE,
            OrderError::Store(_) | OrderError::DeadLetter(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match &self {
            OrderError::Validation(violations) => Json(json!({
                "error": self.to_string(),
                "violations": violations,
            })),
            _ => Json(json!({
                "error": self.to_string()
            })),
        };

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the order service.
pub type Result<T> = std::result::Result<T, OrderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_joins_all_violations() {
        let err = OrderError::Validation(vec![
            "order_uid is required".to_string(),
            "items must be non-empty".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "validation failed: order_uid is required; items must be non-empty"
        );
    }

    #[test]
    fn test_status_mapping() {
        let resp = OrderError::NotFound("b1".into()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = OrderError::Timeout("get_order".into()).into_response();
        assert_eq!(resp.status(), StatusCode::GATEWAY_TIMEOUT);

        let resp = OrderError::Store("boom".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
