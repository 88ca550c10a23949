//! Change notifications for external consumers.
//!
//! Delivery is best-effort: callers log a failed publish and move on, the
//! stored order state is never rolled back because of it.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::{
    clock::Clock,
    models::{Order, OrderStatus},
};

pub const DEFAULT_TOPIC: &str = "order.status.changed";

#[derive(Debug, Error)]
pub enum EventError {
    #[error("event channel has no subscribers")]
    Closed,

    #[error("failed to encode event")]
    Serialize(#[from] serde_json::Error),
}

#[async_trait]
pub trait EventSink: Send + Sync {
    async fn order_created(&self, order: &Order) -> Result<(), EventError>;
    async fn order_updated(&self, order: &Order) -> Result<(), EventError>;
    async fn order_deleted(&self, id: Uuid, user_id: &str) -> Result<(), EventError>;
}

/// Sink without a transport; every event only shows up in the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogEventSink;

#[async_trait]
impl EventSink for LogEventSink {
    async fn order_created(&self, order: &Order) -> Result<(), EventError> {
        tracing::info!(order_id = %order.id, status = %order.status, "order created");
        Ok(())
    }

    async fn order_updated(&self, order: &Order) -> Result<(), EventError> {
        tracing::info!(order_id = %order.id, status = %order.status, "order updated");
        Ok(())
    }

    async fn order_deleted(&self, id: Uuid, user_id: &str) -> Result<(), EventError> {
        tracing::info!(order_id = %id, user_id, "order deleted");
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderEvent {
    pub topic: String,
    pub order_id: Uuid,
    pub user_id: String,
    pub status: OrderStatus,
    pub occurred_at: DateTime<Utc>,
}

/// Publishes JSON-encoded [`OrderEvent`]s on an in-process broadcast bus.
/// Consumers attach with [`BroadcastEventSink::subscribe`].
#[derive(Debug)]
pub struct BroadcastEventSink {
    topic: String,
    tx: broadcast::Sender<String>,
    clock: Arc<dyn Clock>,
}

impl BroadcastEventSink {
    pub fn new(topic: impl Into<String>, capacity: usize, clock: Arc<dyn Clock>) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            topic: topic.into(),
            tx,
            clock,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn subscribe(&self) -> broadcast::Receiver<String> {
        self.tx.subscribe()
    }

    fn publish(&self, order_id: Uuid, user_id: &str, status: OrderStatus) -> Result<(), EventError> {
        let event = OrderEvent {
            topic: self.topic.clone(),
            order_id,
            user_id: user_id.to_string(),
            status,
            occurred_at: self.clock.now(),
        };
        let payload = serde_json::to_string(&event)?;
        self.tx.send(payload).map_err(|_| EventError::Closed)?;
        Ok(())
    }
}

#[async_trait]
impl EventSink for BroadcastEventSink {
    async fn order_created(&self, order: &Order) -> Result<(), EventError> {
        self.publish(order.id, &order.user_id, OrderStatus::Created)
    }

    async fn order_updated(&self, order: &Order) -> Result<(), EventError> {
        self.publish(order.id, &order.user_id, order.status)
    }

    async fn order_deleted(&self, id: Uuid, user_id: &str) -> Result<(), EventError> {
        self.publish(id, user_id, OrderStatus::Deleted)
    }
}

/// Writes every payload received on `rx` to the log until the bus closes.
/// Stands in for an external message-bus producer.
pub async fn relay_to_log(mut rx: broadcast::Receiver<String>, topic: String) {
    loop {
        match rx.recv().await {
            Ok(payload) => tracing::info!(topic = %topic, %payload, "event published"),
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(topic = %topic, skipped, "event relay lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
