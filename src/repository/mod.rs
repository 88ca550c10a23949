use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{error::AppResult, models::Order};

pub mod memory;
pub mod postgres;

pub use memory::OrderStore;
pub use postgres::PgOrderRepository;

/// Storage contract for orders. Every returned order is an independent copy.
///
/// Implementations keep the same error taxonomy: `DuplicateId` on create
/// collisions, `NotFound` for unknown ids, `ForeignOwnership` when a delete
/// comes from someone other than the owner.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn create(&self, order: &Order) -> AppResult<()>;

    /// Does not filter soft-deleted orders.
    async fn get_by_id(&self, id: Uuid) -> AppResult<Order>;

    /// Replaces the stored order wholesale.
    async fn update(&self, order: &Order) -> AppResult<()>;

    async fn mark_deleted(&self, id: Uuid, user_id: &str) -> AppResult<()>;

    /// Non-deleted orders created at or after `from`, in no particular order.
    async fn list_from(&self, from: DateTime<Utc>) -> AppResult<Vec<Order>>;
}

/// Bulk time-driven advancement, driven by the worker.
#[async_trait]
pub trait StatusAdvancer: Send + Sync {
    /// Applies one status step to every live order that is due and returns
    /// copies of the orders that changed.
    async fn advance_statuses(&self, now: DateTime<Utc>) -> AppResult<Vec<Order>>;
}
