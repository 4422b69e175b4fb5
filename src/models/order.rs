//! Order aggregate
//!
//! The JSON shape here is the one producers publish and the one `GET /order/:order_uid`
//! returns. Every field defaults when absent so that a sparse payload still decodes
//! and is rejected by validation rather than by the decoder.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// == Order ==
/// An order with its delivery, payment and items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Order {
    /// Primary key
    pub order_uid: String,
    pub track_number: String,
    /// Entry channel the order came in through
    pub entry: String,
    pub delivery: Delivery,
    pub payment: Payment,
    #[serde(deserialize_with = "null_as_empty")]
    pub items: Vec<Item>,
    pub locale: String,
    pub customer_id: String,
    pub delivery_service: String,
    #[serde(rename = "shardkey")]
    pub shard_key: String,
    pub sm_id: i64,
    pub date_created: DateTime<Utc>,
    pub oof_shard: String,
}

impl Order {
    /// Returns true once `date_created` carries a real timestamp.
    ///
    /// The Unix epoch (the decode default) and anything before it count as unset.
    pub fn has_creation_time(&self) -> bool {
        self.date_created > DateTime::<Utc>::default()
    }
}

/// Decodes an explicit `null` list as empty.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

// == Delivery ==
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Delivery {
    pub name: String,
    pub phone: String,
    pub zip: String,
    pub city: String,
    pub address: String,
    pub region: String,
    pub email: String,
}

// == Payment ==
/// Payment details; monetary amounts are in minor units.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Payment {
    pub transaction: String,
    pub request_id: String,
    pub currency: String,
    pub provider: String,
    pub amount: i64,
    /// Unix seconds
    pub payment_dt: i64,
    pub bank: String,
    pub delivery_cost: i64,
    pub goods_total: i64,
    pub custom_fee: i64,
}

// == Item ==
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Item {
    pub chrt_id: i64,
    pub track_number: String,
    pub price: i64,
    pub rid: String,
    pub name: String,
    /// Sale percent
    pub sale: i64,
    pub size: String,
    pub total_price: i64,
    pub nm_id: i64,
    pub brand: String,
    pub status: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "order_uid": "b563feb7b2b84b6test",
        "track_number": "WBILMTESTTRACK",
        "entry": "WBIL",
        "delivery": {
            "name": "Test Testov", "phone": "+9720000000", "zip": "2639809",
            "city": "Kiryat Mozkin", "address": "Ploshad Mira 15", "region": "Kraiot",
            "email": "test@gmail.com"
        },
        "payment": {
            "transaction": "b563feb7b2b84b6test", "request_id": "", "currency": "USD",
            "provider": "wbpay", "amount": 1817, "payment_dt": 1637907727, "bank": "alpha",
            "delivery_cost": 1500, "goods_total": 317, "custom_fee": 0
        },
        "items": [{
            "chrt_id": 9934930, "track_number": "WBILMTESTTRACK", "price": 453,
            "rid": "ab4219087a764ae0btest", "name": "Mascaras", "sale": 30, "size": "0",
            "total_price": 317, "nm_id": 2389212, "brand": "Vivienne Sabo", "status": 202
        }],
        "locale": "en",
        "internal_signature": "",
        "customer_id": "test",
        "delivery_service": "meest",
        "shardkey": "9",
        "sm_id": 99,
        "date_created": "2021-11-26T06:22:19Z",
        "oof_shard": "1"
    }"#;

    #[test]
    fn test_order_deserialize_full_payload() {
        let order: Order = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(order.order_uid, "b563feb7b2b84b6test");
        assert_eq!(order.shard_key, "9");
        assert_eq!(order.sm_id, 99);
        assert_eq!(order.delivery.city, "Kiryat Mozkin");
        assert_eq!(order.payment.amount, 1817);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].brand, "Vivienne Sabo");
        assert!(order.has_creation_time());
    }

    #[test]
    fn test_order_serialize_uses_wire_names() {
        let order: Order = serde_json::from_str(SAMPLE).unwrap();
        let json: serde_json::Value = serde_json::to_value(&order).unwrap();
        assert_eq!(json["shardkey"], "9");
        assert!(json.get("shard_key").is_none());
        assert_eq!(json["items"][0]["chrt_id"], 9934930);
        assert_eq!(json["payment"]["payment_dt"], 1637907727);
    }

    #[test]
    fn test_sparse_payload_decodes_with_defaults() {
        let order: Order = serde_json::from_str(r#"{"order_uid": "x"}"#).unwrap();
        assert_eq!(order.order_uid, "x");
        assert!(order.items.is_empty());
        assert!(!order.has_creation_time());
    }

    #[test]
    fn test_null_items_decode_as_empty() {
        let order: Order =
            serde_json::from_str(r#"{"order_uid": "x", "items": null}"#).unwrap();
        assert!(order.items.is_empty());
    }

    #[test]
    fn test_wrong_type_fails_to_decode() {
        let result = serde_json::from_str::<Order>(r#"{"order_uid": 42}"#);
        assert!(result.is_err());
    }
}
