use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use uuid::Uuid;

use crate::{
    clock::{Clock, SystemClock},
    error::{AppError, AppResult},
    models::{Order, OrderStatus},
    repository::{OrderRepository, StatusAdvancer},
    status,
};

/// In-process order storage. One lock guards the whole map; reads share it,
/// every mutation (including the bulk advancement scan) holds it exclusively.
/// Nothing outside this type ever sees the map itself, only clones.
#[derive(Debug)]
pub struct OrderStore {
    orders: RwLock<HashMap<Uuid, Order>>,
    clock: Arc<dyn Clock>,
}

impl Default for OrderStore {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl OrderStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            orders: RwLock::new(HashMap::new()),
            clock,
        }
    }

    pub fn create(&self, order: &Order) -> AppResult<()> {
        let mut orders = self.orders.write();
        if orders.contains_key(&order.id) {
            return Err(AppError::DuplicateId(order.id));
        }
        orders.insert(order.id, order.clone());
        Ok(())
    }

    pub fn get_by_id(&self, id: Uuid) -> AppResult<Order> {
        self.orders.read().get(&id).cloned().ok_or(AppError::NotFound)
    }

    pub fn update(&self, order: &Order) -> AppResult<()> {
        let mut orders = self.orders.write();
        let stored = orders.get_mut(&order.id).ok_or(AppError::NotFound)?;
        *stored = order.clone();
        Ok(())
    }

    /// Soft delete. Repeating it on an already deleted order succeeds and
    /// stamps `updated_at` again.
    pub fn mark_deleted(&self, id: Uuid, user_id: &str) -> AppResult<()> {
        let now = self.clock.now();
        let mut orders = self.orders.write();
        let stored = orders.get_mut(&id).ok_or(AppError::NotFound)?;
        if stored.user_id != user_id {
            return Err(AppError::ForeignOwnership);
        }
        stored.is_deleted = true;
        stored.status = OrderStatus::Deleted;
        stored.updated_at = now;
        Ok(())
    }

    pub fn list_from(&self, from: DateTime<Utc>) -> Vec<Order> {
        self.orders
            .read()
            .values()
            .filter(|order| !order.is_deleted && order.created_at >= from)
            .cloned()
            .collect()
    }

    pub fn advance_statuses(&self, now: DateTime<Utc>) -> Vec<Order> {
        let mut orders = self.orders.write();
        let mut changed = Vec::new();
        for order in orders.values_mut() {
            if status::advance(now, order) {
                changed.push(order.clone());
            }
        }
        changed
    }

    pub fn len(&self) -> usize {
        self.orders.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl OrderRepository for OrderStore {
    async fn create(&self, order: &Order) -> AppResult<()> {
        OrderStore::create(self, order)
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Order> {
        OrderStore::get_by_id(self, id)
    }

    async fn update(&self, order: &Order) -> AppResult<()> {
        OrderStore::update(self, order)
    }

    async fn mark_deleted(&self, id: Uuid, user_id: &str) -> AppResult<()> {
        OrderStore::mark_deleted(self, id, user_id)
    }

    async fn list_from(&self, from: DateTime<Utc>) -> AppResult<Vec<Order>> {
        Ok(OrderStore::list_from(self, from))
    }
}

#[async_trait]
impl StatusAdvancer for OrderStore {
    async fn advance_statuses(&self, now: DateTime<Utc>) -> AppResult<Vec<Order>> {
        Ok(OrderStore::advance_statuses(self, now))
    }
}
