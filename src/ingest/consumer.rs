//! Ingestion Loop Module
//!
//! Drives one message at a time through decode, validate and create. Any
//! per-message failure becomes a dead-letter event; only a failing source or
//! cancellation ends the loop.

use std::sync::Arc;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use super::dead_letter::{dead_letter_message, DeadLetterSink, FailureReason};
use super::{validate_order, Message, MessageSource};
use crate::error::{OrderError, Result};
use crate::models::Order;
use crate::service::OrderService;

// == Outcome ==
/// Terminal state of one pass through the loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Order stored
    Committed { order_uid: String },
    /// Message diverted; `forwarded` is false when no sink is configured or
    /// the sink refused the write
    DeadLettered {
        reason: FailureReason,
        error: OrderError,
        forwarded: bool,
    },
    /// Source failure, ends the loop
    Fatal(OrderError),
}

// == Stats ==
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestStats {
    pub received: u64,
    pub committed: u64,
    pub dead_lettered: u64,
    pub dead_letter_failures: u64,
}

impl IngestStats {
    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Committed { .. } => self.committed += 1,
            Outcome::DeadLettered { forwarded, .. } => {
                self.dead_lettered += 1;
                if !forwarded {
                    self.dead_letter_failures += 1;
                }
            }
            Outcome::Fatal(_) => {}
        }
    }
}

// == Ingestion Loop ==
pub struct IngestionLoop<S: MessageSource> {
    source: S,
    service: Arc<dyn OrderService>,
    dead_letter: Option<Arc<dyn DeadLetterSink>>,
    stats: IngestStats,
}

impl<S: MessageSource> IngestionLoop<S> {
    /// Creates a loop without a dead-letter sink; failed messages are logged
    /// and skipped.
    pub fn new(source: S, service: Arc<dyn OrderService>) -> Self {
        Self {
            source,
            service,
            dead_letter: None,
            stats: IngestStats::default(),
        }
    }

    pub fn with_dead_letter(mut self, sink: Arc<dyn DeadLetterSink>) -> Self {
        self.dead_letter = Some(sink);
        self
    }

    // == Run ==
    /// Consumes messages until `shutdown` fires or the source fails.
    ///
    /// Cancellation is observed only while waiting for the next message, so
    /// a message that has been read is always carried to a terminal state.
    pub async fn run(mut self, shutdown: CancellationToken) -> Result<IngestStats> {
        info!(topic = %self.source.topic(), "ingestion loop started");

        loop {
            let message = tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    info!(
                        received = self.stats.received,
                        committed = self.stats.committed,
                        dead_lettered = self.stats.dead_lettered,
                        "ingestion loop stopped"
                    );
                    return Ok(self.stats);
                }
                read = self.source.read_next() => read,
            };

            let outcome = match message {
                Ok(message) => {
                    self.stats.received += 1;
                    self.process(&message).await
                }
                Err(e) => Outcome::Fatal(e),
            };

            if let Outcome::Fatal(e) = outcome {
                error!(error = %e, "message source failed, stopping ingestion");
                return Err(e);
            }
            self.stats.record(&outcome);
        }
    }

    // == Process ==
    /// Carries one message to `Committed` or `DeadLettered`.
    pub async fn process(&self, message: &Message) -> Outcome {
        let order: Order = match serde_json::from_slice(&message.value) {
            Ok(order) => order,
            Err(e) => {
                let cause = OrderError::InvalidPayload(e.to_string());
                return self
                    .divert(message, FailureReason::InvalidPayload, cause)
                    .await;
            }
        };

        if let Err(cause) = validate_order(&order) {
            return self
                .divert(message, FailureReason::SchemaValidation, cause)
                .await;
        }

        if let Err(cause) = self.service.create(&order).await {
            return self
                .divert(message, FailureReason::BusinessError, cause)
                .await;
        }

        info!(order_uid = %order.order_uid, "order committed");
        Outcome::Committed {
            order_uid: order.order_uid,
        }
    }

    async fn divert(&self, message: &Message, reason: FailureReason, cause: OrderError) -> Outcome {
        error!(
            key = %message.key_lossy(),
            reason = %reason,
            error = %cause,
            "message failed, dead-lettering"
        );

        let forwarded = match &self.dead_letter {
            Some(sink) => {
                let dlq = dead_letter_message(message, reason, &cause, self.source.topic(), Utc::now());
                match sink.write(dlq).await {
                    Ok(()) => true,
                    Err(e) => {
                        error!(topic = %sink.topic(), error = %e, "dead-letter write failed");
                        false
                    }
                }
            }
            None => {
                warn!(key = %message.key_lossy(), "no dead-letter sink configured, message skipped");
                false
            }
        };

        Outcome::DeadLettered {
            reason,
            error: cause,
            forwarded,
        }
    }
}
