//! Ingestion Module
//!
//! Pulls order messages from a source, decodes and validates them, hands them
//! to the order service and diverts anything that fails to a dead-letter sink.
//!
//! # Per-message flow
//! 1. Receive (or stop on cancellation)
//! 2. Decode JSON, else dead-letter as `invalid_payload`
//! 3. Validate structure, else dead-letter as `schema_validation`
//! 4. Persist through the service, else dead-letter as `business_error`
//! 5. Commit

mod consumer;
mod dead_letter;
mod message;
mod source;
mod validate;

pub use consumer::{IngestStats, IngestionLoop, Outcome};
pub use dead_letter::{
    dead_letter_channel, dead_letter_message, ChannelDeadLetterSink, DeadLetterSink, FailureReason,
    HEADER_ERROR, HEADER_ORIGIN_TOPIC, HEADER_TIMESTAMP,
};
pub use message::{Header, Message};
pub use source::{message_channel, ChannelPublisher, ChannelSource, MessageSource};
pub use validate::validate_order;
