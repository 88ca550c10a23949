use std::{sync::Arc, time::Duration};

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::{
    clock::Clock,
    error::AppResult,
    events::EventSink,
    models::Order,
    repository::StatusAdvancer,
};

pub const DEFAULT_TICK: Duration = Duration::from_millis(500);

/// Periodically moves every live order along the status table and announces
/// each change.
pub struct AdvancementWorker {
    advancer: Arc<dyn StatusAdvancer>,
    events: Arc<dyn EventSink>,
    clock: Arc<dyn Clock>,
    interval: Duration,
}

impl AdvancementWorker {
    pub fn new(
        advancer: Arc<dyn StatusAdvancer>,
        events: Arc<dyn EventSink>,
        clock: Arc<dyn Clock>,
        interval: Duration,
    ) -> Self {
        Self {
            advancer,
            events,
            clock,
            interval,
        }
    }

    /// One pass: advance what is due, then notify for every changed order.
    /// A failed notification does not undo the stored transition.
    pub async fn tick(&self) -> AppResult<Vec<Order>> {
        let now = self.clock.now();
        let changed = self.advancer.advance_statuses(now).await?;

        for order in &changed {
            if let Err(err) = self.events.order_updated(order).await {
                tracing::warn!(order_id = %order.id, status = %order.status, error = %err, "status event not delivered");
            }
        }
        if !changed.is_empty() {
            tracing::debug!(changed = changed.len(), "advanced order statuses");
        }

        Ok(changed)
    }

    /// Runs until `shutdown` fires. A tick that has already started always
    /// finishes first.
    pub async fn run(self, shutdown: CancellationToken) {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick of a tokio interval completes immediately.
        interval.tick().await;

        tracing::info!(interval_ms = self.interval.as_millis() as u64, "status worker started");
        loop {
            tokio::select! {
                biased;
                () = shutdown.cancelled() => break,
                _ = interval.tick() => {
                    if let Err(err) = self.tick().await {
                        tracing::error!(error = %err, "status advancement failed");
                    }
                }
            }
        }
        tracing::info!("status worker stopped");
    }
}
