use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Created,
    Pending,
    Confirmed,
    Cooking,
    Delivering,
    Delivered,
    Completed,
    Canceled,
    Updated,
    Deleted,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Created => "created",
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Cooking => "cooking",
            OrderStatus::Delivering => "delivering",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Completed => "completed",
            OrderStatus::Canceled => "canceled",
            OrderStatus::Updated => "updated",
            OrderStatus::Deleted => "deleted",
        }
    }

    /// No automatic transition ever applies once one of these is reached.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Canceled | OrderStatus::Completed | OrderStatus::Deleted
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown order status `{0}`")]
pub struct UnknownStatus(pub String);

impl FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let status = match s {
            "created" => OrderStatus::Created,
            "pending" => OrderStatus::Pending,
            "confirmed" => OrderStatus::Confirmed,
            "cooking" => OrderStatus::Cooking,
            "delivering" => OrderStatus::Delivering,
            "delivered" => OrderStatus::Delivered,
            "completed" => OrderStatus::Completed,
            "canceled" => OrderStatus::Canceled,
            "updated" => OrderStatus::Updated,
            "deleted" => OrderStatus::Deleted,
            other => return Err(UnknownStatus(other.to_string())),
        };
        Ok(status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Item {
    pub food_id: String,
    pub name: String,
    pub quantity: i32,
    pub price: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DeliveryAddress {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub street: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub house: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub apartment: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub floor: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub user_id: String,
    pub order_number: String,
    pub fio: String,
    pub restaurant_id: String,
    pub items: Vec<Item>,
    pub total_price: i64,
    pub address: DeliveryAddress,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status_changed_at: DateTime<Utc>,
    pub estimated_delivery_at: DateTime<Utc>,
    pub is_deleted: bool,
}

impl Order {
    /// Sum of quantity times unit price over all line items.
    pub fn items_total(items: &[Item]) -> AppResult<i64> {
        items
            .iter()
            .try_fold(0i64, |total, item| {
                item.price
                    .checked_mul(i64::from(item.quantity))
                    .and_then(|line| total.checked_add(line))
            })
            .ok_or_else(|| AppError::InvalidInput("total price overflows".into()))
    }
}
