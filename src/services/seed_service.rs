use chrono::TimeDelta;
use uuid::Uuid;

use crate::{
    dto::orders::OrderList,
    error::AppResult,
    middleware::auth::AuthUser,
    models::{DeliveryAddress, Item, Order, OrderStatus},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub const DEFAULT_SEED_COUNT: usize = 10;
pub const MAX_SEED_COUNT: usize = 200;

const STATUS_MIX: [OrderStatus; 10] = [
    OrderStatus::Created,
    OrderStatus::Pending,
    OrderStatus::Confirmed,
    OrderStatus::Cooking,
    OrderStatus::Delivering,
    OrderStatus::Delivered,
    OrderStatus::Canceled,
    OrderStatus::Updated,
    OrderStatus::Completed,
    OrderStatus::Pending,
];

const DISHES: [&str; 4] = ["Burger", "Pizza", "Sushi", "Pasta"];
const DRINKS: [&str; 3] = ["Cola", "Tea", "Juice"];
const STREETS: [&str; 4] = ["Lenina", "Tverskaya", "Nevsky", "Arbat"];
const RECIPIENTS: [&str; 4] = ["Ivan Ivanov", "Petr Petrov", "Anna Smirnova", "John Doe"];
const RESTAURANTS: [&str; 3] = ["rest-1", "rest-2", "rest-3"];
const COMMENTS: [&str; 3] = ["Call 5 minutes ahead", "Intercom code 1234", "Leave at the door"];

/// Creates `count` demo orders for `user` (10 when `None`), spread over the
/// last quarter hour with timestamps that fit each order's status.
pub async fn seed_orders(
    state: &AppState,
    user: &AuthUser,
    count: Option<usize>,
) -> AppResult<ApiResponse<OrderList>> {
    let count = count
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_SEED_COUNT)
        .min(MAX_SEED_COUNT);
    let now = state.clock.now();

    let mut seeded = Vec::with_capacity(count);
    for i in 0..count {
        let order = demo_order(&user.user_id, i, now)?;
        state.orders.create(&order).await?;
        seeded.push(order);
    }
    seeded.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    tracing::info!(user_id = %user.user_id, count, "seeded demo orders");

    let meta = Meta::with_total(seeded.len());
    Ok(ApiResponse::success(
        "Seeded",
        OrderList { items: seeded },
        Some(meta),
    ))
}

fn demo_order(user_id: &str, i: usize, now: chrono::DateTime<chrono::Utc>) -> AppResult<Order> {
    let status = STATUS_MIX[i % STATUS_MIX.len()];
    let n = i as i64;
    let created_at = now - TimeDelta::minutes(15 - n.min(15));

    let offset = match status {
        OrderStatus::Pending => TimeDelta::seconds(2),
        OrderStatus::Confirmed => TimeDelta::seconds(7),
        OrderStatus::Cooking => TimeDelta::seconds(12),
        OrderStatus::Delivering => TimeDelta::minutes(6),
        OrderStatus::Delivered | OrderStatus::Completed => TimeDelta::minutes(20),
        OrderStatus::Canceled | OrderStatus::Deleted => TimeDelta::seconds(3),
        OrderStatus::Updated => TimeDelta::seconds(15),
        OrderStatus::Created => TimeDelta::zero(),
    };
    let status_changed_at = (created_at + offset).min(now);

    let items = vec![
        Item {
            food_id: format!("f-{}", i + 1),
            name: DISHES[i % DISHES.len()].to_string(),
            quantity: 1 + (i % 3) as i32,
            price: 300 + 50 * (n % 5),
        },
        Item {
            food_id: format!("d-{}", i + 2),
            name: DRINKS[(i + 1) % DRINKS.len()].to_string(),
            quantity: 1,
            price: 120 + 10 * (n % 4),
        },
    ];

    Ok(Order {
        id: Uuid::new_v4(),
        user_id: user_id.to_string(),
        order_number: format!("{:06}", 1000 + i),
        fio: RECIPIENTS[i % RECIPIENTS.len()].to_string(),
        restaurant_id: RESTAURANTS[i % RESTAURANTS.len()].to_string(),
        total_price: Order::items_total(&items)?,
        items,
        address: DeliveryAddress {
            street: STREETS[i % STREETS.len()].to_string(),
            house: (10 + i).to_string(),
            apartment: (20 + i * 3).to_string(),
            floor: (1 + i % 10).to_string(),
            comment: COMMENTS[i % COMMENTS.len()].to_string(),
        },
        status,
        created_at,
        updated_at: status_changed_at,
        status_changed_at,
        estimated_delivery_at: created_at + TimeDelta::minutes(30 + n),
        is_deleted: status == OrderStatus::Deleted,
    })
}
