//! Message sources
//!
//! [`MessageSource`] is the only thing the ingestion loop needs from a broker.
//! The channel-backed implementation connects an in-process publisher to the loop.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::Message;
use crate::error::{OrderError, Result};
use crate::models::Order;

/// Blocking reader of the next inbound message.
#[async_trait]
pub trait MessageSource: Send + Sync {
    /// Waits for the next message. An error ends the ingestion loop.
    async fn read_next(&mut self) -> Result<Message>;

    /// Name of the topic being consumed, recorded on dead-lettered messages.
    fn topic(&self) -> &str;
}

/// Creates a bounded in-process topic.
pub fn message_channel(
    topic: impl Into<String>,
    capacity: usize,
) -> (ChannelPublisher, ChannelSource) {
    let topic = topic.into();
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (
        ChannelPublisher {
            topic: topic.clone(),
            tx,
        },
        ChannelSource { topic, rx },
    )
}

/// Receiving end of an in-process topic.
#[derive(Debug)]
pub struct ChannelSource {
    topic: String,
    rx: mpsc::Receiver<Message>,
}

#[async_trait]
impl MessageSource for ChannelSource {
    async fn read_next(&mut self) -> Result<Message> {
        self.rx
            .recv()
            .await
            .ok_or_else(|| OrderError::Source(format!("topic '{}' closed", self.topic)))
    }

    fn topic(&self) -> &str {
        &self.topic
    }
}

/// Producing end of an in-process topic.
#[derive(Debug, Clone)]
pub struct ChannelPublisher {
    topic: String,
    tx: mpsc::Sender<Message>,
}

impl ChannelPublisher {
    /// Publishes a raw message, waiting for room in the channel.
    pub async fn publish(&self, message: Message) -> Result<()> {
        self.tx
            .send(message)
            .await
            .map_err(|_| OrderError::Source(format!("topic '{}' closed", self.topic)))
    }

    /// Publishes an order as JSON, keyed by its id.
    pub async fn publish_order(&self, order: &Order) -> Result<()> {
        let value =
            serde_json::to_vec(order).map_err(|e| OrderError::InvalidPayload(e.to_string()))?;
        self.publish(Message::new(value).with_key(order.order_uid.as_bytes()))
            .await
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}
