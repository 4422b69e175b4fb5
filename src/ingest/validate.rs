//! Structural validation of inbound orders.
//!
//! Only checks what is intrinsic to a single message. Every violated rule is
//! collected so one dead-letter event carries the complete diagnostic.

use crate::error::{OrderError, Result};
use crate::models::Order;

pub fn validate_order(order: &Order) -> Result<()> {
    let required = [
        ("order_uid", &order.order_uid),
        ("track_number", &order.track_number),
        ("entry", &order.entry),
        ("customer_id", &order.customer_id),
        ("delivery_service", &order.delivery_service),
        ("shardkey", &order.shard_key),
        ("oof_shard", &order.oof_shard),
    ];

    let mut violations: Vec<String> = required
        .iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(field, _)| format!("{} is required", field))
        .collect();

    if order.items.is_empty() {
        violations.push("items must be non-empty".to_string());
    }
    if !order.has_creation_time() {
        violations.push("date_created must be set".to_string());
    }
    if order.sm_id < 0 {
        violations.push("sm_id must be >= 0".to_string());
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(OrderError::Validation(violations))
    }
}
