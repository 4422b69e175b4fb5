//! Dead-letter forwarding
//!
//! A dead-lettered message keeps the original key and payload byte for byte.
//! Diagnostics travel only in appended headers.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use tokio::sync::mpsc;

use super::Message;
use crate::error::{OrderError, Result};

/// Header carrying `<reason>: <cause>`
pub const HEADER_ERROR: &str = "error";
/// Header carrying the topic the message was consumed from
pub const HEADER_ORIGIN_TOPIC: &str = "origin-topic";
/// Header carrying the UTC time the message was diverted
pub const HEADER_TIMESTAMP: &str = "timestamp";

/// Why a message was diverted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// Payload was not a decodable order
    InvalidPayload,
    /// Order decoded but failed structural validation
    SchemaValidation,
    /// The service refused or failed to persist the order
    BusinessError,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::InvalidPayload => "invalid_payload",
            FailureReason::SchemaValidation => "schema_validation",
            FailureReason::BusinessError => "business_error",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds the dead-letter copy of `source`.
pub fn dead_letter_message(
    source: &Message,
    reason: FailureReason,
    cause: &OrderError,
    origin_topic: &str,
    at: DateTime<Utc>,
) -> Message {
    source
        .clone()
        .with_header(HEADER_ERROR, format!("{}: {}", reason, cause))
        .with_header(HEADER_ORIGIN_TOPIC, origin_topic)
        .with_header(
            HEADER_TIMESTAMP,
            at.to_rfc3339_opts(SecondsFormat::Nanos, true),
        )
}

/// Destination for messages the ingestion loop cannot process.
#[async_trait]
pub trait DeadLetterSink: Send + Sync {
    async fn write(&self, message: Message) -> Result<()>;

    /// Name of the dead-letter topic, for logs.
    fn topic(&self) -> &str;
}

/// Creates an in-process dead-letter topic.
pub fn dead_letter_channel(
    topic: impl Into<String>,
    capacity: usize,
) -> (ChannelDeadLetterSink, mpsc::Receiver<Message>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (
        ChannelDeadLetterSink {
            topic: topic.into(),
            tx,
        },
        rx,
    )
}

/// Dead-letter sink backed by a bounded channel.
///
/// Writes never wait: a full or closed channel fails the write immediately so
/// the ingestion loop is never held up by its dead-letter consumer.
#[derive(Debug, Clone)]
pub struct ChannelDeadLetterSink {
    topic: String,
    tx: mpsc::Sender<Message>,
}

#[async_trait]
impl DeadLetterSink for ChannelDeadLetterSink {
    async fn write(&self, message: Message) -> Result<()> {
        self.tx.try_send(message).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => {
                OrderError::DeadLetter(format!("topic '{}' is full", self.topic))
            }
            mpsc::error::TrySendError::Closed(_) => {
                OrderError::DeadLetter(format!("topic '{}' closed", self.topic))
            }
        })
    }

    fn topic(&self) -> &str {
        &self.topic
    }
}
