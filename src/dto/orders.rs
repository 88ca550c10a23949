use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{DeliveryAddress, Item, Order, OrderStatus};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub order_number: String,
    #[serde(default)]
    pub fio: String,
    #[serde(default)]
    pub restaurant_id: String,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub address: DeliveryAddress,
}

/// Partial edit; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateOrderRequest {
    pub order_number: Option<String>,
    pub fio: Option<String>,
    pub items: Option<Vec<Item>>,
    pub address: Option<DeliveryAddress>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct OrderList {
    #[schema(value_type = Vec<Order>)]
    pub items: Vec<Order>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderStatusView {
    pub order_id: Uuid,
    pub status: OrderStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteOrderResponse {
    pub id: Uuid,
    pub status: OrderStatus,
}
