use std::sync::Arc;

use crate::{
    clock::Clock, config::StorageBackend, events::EventSink, repository::OrderRepository,
};

#[derive(Clone)]
pub struct AppState {
    pub orders: Arc<dyn OrderRepository>,
    pub events: Arc<dyn EventSink>,
    pub clock: Arc<dyn Clock>,
    pub backend: StorageBackend,
}
