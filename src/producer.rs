//! Demo producer
//!
//! Builds deterministic, fully valid sample orders and publishes them onto the
//! inbound topic so a fresh process has something to serve.

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::Result;
use crate::ingest::ChannelPublisher;
use crate::models::{Delivery, Item, Order, Payment};

const CITIES: [&str; 5] = ["Moscow", "Kazan", "Samara", "Perm", "Ufa"];
const BRANDS: [&str; 4] = ["Vivienne Sabo", "Logitech", "Kingston", "JBL"];
const DELIVERY_SERVICES: [&str; 3] = ["meest", "cdek", "boxberry"];

/// 2024-01-01T00:00:00Z; sample `seq` is created `seq` minutes later
const BASE_TIMESTAMP: i64 = 1_704_067_200;

/// Builds the sample order `b<seq>`.
///
/// Item totals are `price - price * sale / 100` and the payment's goods total
/// is their sum, so every sample passes validation.
pub fn sample_order(seq: u64) -> Order {
    let order_uid = format!("b{}", seq);
    let track_number = format!("WBILMT{:06}", 100_000 + seq);
    let pick = |len: usize| (seq as usize) % len;

    let items: Vec<Item> = (0..(seq % 3 + 1) as i64)
        .map(|n| {
            let price = 10_000 + ((seq as i64 * 7 + n * 13) % 100) * 1_000;
            let sale = (seq as i64 + n * 5) % 31;
            Item {
                chrt_id: 100_000 + seq as i64 * 10 + n,
                track_number: track_number.clone(),
                price,
                rid: format!("{}-rid-{}", order_uid, n),
                name: format!("Item {}", n + 1),
                sale,
                size: ((n % 5) + 1).to_string(),
                total_price: price - price * sale / 100,
                nm_id: 2_000_000 + seq as i64 * 10 + n,
                brand: BRANDS[(pick(BRANDS.len()) + n as usize) % BRANDS.len()].to_string(),
                status: 202,
            }
        })
        .collect();

    let goods_total: i64 = items.iter().map(|item| item.total_price).sum();
    let delivery_cost = 1_500;
    let created = DateTime::<Utc>::from_timestamp(BASE_TIMESTAMP + seq as i64 * 60, 0)
        .unwrap_or_default();

    Order {
        order_uid: order_uid.clone(),
        track_number: track_number.clone(),
        entry: "WBIL".to_string(),
        delivery: Delivery {
            name: format!("Customer {}", seq),
            phone: format!("+7900{:07}", seq),
            zip: format!("{:06}", 100_000 + seq % 900_000),
            city: CITIES[pick(CITIES.len())].to_string(),
            address: format!("Lenina {}", seq % 200 + 1),
            region: CITIES[pick(CITIES.len())].to_string(),
            email: format!("customer{}@example.com", seq),
        },
        payment: Payment {
            transaction: order_uid.clone(),
            request_id: String::new(),
            currency: "RUB".to_string(),
            provider: "wbpay".to_string(),
            amount: goods_total + delivery_cost,
            payment_dt: created.timestamp(),
            bank: "alpha".to_string(),
            delivery_cost,
            goods_total,
            custom_fee: 0,
        },
        items,
        locale: "en".to_string(),
        customer_id: format!("customer_{}", seq),
        delivery_service: DELIVERY_SERVICES[pick(DELIVERY_SERVICES.len())].to_string(),
        shard_key: (seq % 10).to_string(),
        sm_id: (seq % 100) as i64,
        date_created: created,
        oof_shard: "1".to_string(),
    }
}

/// Publishes samples `b1..=b<count>` keyed by order id.
pub async fn publish_samples(publisher: &ChannelPublisher, count: usize) -> Result<()> {
    for seq in 1..=count as u64 {
        publisher.publish_order(&sample_order(seq)).await?;
    }
    info!(count, topic = %publisher.topic(), "published sample orders");
    Ok(())
}
