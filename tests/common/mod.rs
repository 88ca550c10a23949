#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use food_order_service::{
    clock::ManualClock,
    config::StorageBackend,
    events::{EventError, EventSink},
    models::{DeliveryAddress, Item, Order, OrderStatus},
    repository::OrderStore,
    state::AppState,
    status,
};
use parking_lot::Mutex;
use uuid::Uuid;

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 8, 31, 12, 0, 0).unwrap()
}

pub fn pizza() -> Item {
    Item {
        food_id: "f1".into(),
        name: "Pizza".into(),
        quantity: 1,
        price: 500,
    }
}

/// A freshly created order as the usecase layer would build it.
pub fn new_order(user_id: &str, created_at: DateTime<Utc>) -> Order {
    let items = vec![pizza()];
    Order {
        id: Uuid::new_v4(),
        user_id: user_id.to_string(),
        order_number: "N-1".into(),
        fio: "Ivanov I.I.".into(),
        restaurant_id: "rest-1".into(),
        total_price: Order::items_total(&items).unwrap(),
        items,
        address: DeliveryAddress {
            street: "Main".into(),
            ..DeliveryAddress::default()
        },
        status: OrderStatus::Created,
        created_at,
        updated_at: created_at,
        status_changed_at: created_at,
        estimated_delivery_at: status::estimated_delivery(created_at),
        is_deleted: false,
    }
}

/// Order that entered `status` at `since`.
pub fn order_in(status: OrderStatus, since: DateTime<Utc>) -> Order {
    let mut order = new_order("u1", since);
    order.status = status;
    order
}

#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    Created(Uuid),
    Updated(Uuid, OrderStatus),
    Deleted(Uuid, String),
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Mutex<Vec<Recorded>>,
}

impl RecordingSink {
    pub fn recorded(&self) -> Vec<Recorded> {
        self.events.lock().clone()
    }
}

#[async_trait]
impl EventSink for RecordingSink {
    async fn order_created(&self, order: &Order) -> Result<(), EventError> {
        self.events.lock().push(Recorded::Created(order.id));
        Ok(())
    }

    async fn order_updated(&self, order: &Order) -> Result<(), EventError> {
        self.events
            .lock()
            .push(Recorded::Updated(order.id, order.status));
        Ok(())
    }

    async fn order_deleted(&self, id: Uuid, user_id: &str) -> Result<(), EventError> {
        self.events
            .lock()
            .push(Recorded::Deleted(id, user_id.to_string()));
        Ok(())
    }
}

/// Sink whose transport is always down.
#[derive(Debug, Default)]
pub struct FailingSink {
    pub attempts: Mutex<usize>,
}

#[async_trait]
impl EventSink for FailingSink {
    async fn order_created(&self, _order: &Order) -> Result<(), EventError> {
        *self.attempts.lock() += 1;
        Err(EventError::Closed)
    }

    async fn order_updated(&self, _order: &Order) -> Result<(), EventError> {
        *self.attempts.lock() += 1;
        Err(EventError::Closed)
    }

    async fn order_deleted(&self, _id: Uuid, _user_id: &str) -> Result<(), EventError> {
        *self.attempts.lock() += 1;
        Err(EventError::Closed)
    }
}

pub struct TestApp {
    pub state: AppState,
    pub store: Arc<OrderStore>,
    pub clock: Arc<ManualClock>,
    pub sink: Arc<RecordingSink>,
}

pub fn test_app() -> TestApp {
    let clock = Arc::new(ManualClock::new(t0()));
    let store = Arc::new(OrderStore::new(clock.clone()));
    let sink = Arc::new(RecordingSink::default());
    let state = AppState {
        orders: store.clone(),
        events: sink.clone(),
        clock: clock.clone(),
        backend: StorageBackend::Memory,
    };
    TestApp {
        state,
        store,
        clock,
        sink,
    }
}
