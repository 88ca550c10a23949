use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    dto::orders::{
        CreateOrderRequest, DeleteOrderResponse, OrderList, OrderStatusView, UpdateOrderRequest,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Item, Order, OrderStatus},
    response::{ApiResponse, Meta},
    state::AppState,
    status,
};

pub async fn create_order(
    state: &AppState,
    user: &AuthUser,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_identified(user)?;
    if payload.restaurant_id.trim().is_empty() {
        return Err(AppError::InvalidInput("restaurant_id is required".into()));
    }
    validate_items(&payload.items)?;
    let total_price = Order::items_total(&payload.items)?;

    let now = state.clock.now();
    let order = Order {
        id: Uuid::new_v4(),
        user_id: user.user_id.clone(),
        order_number: payload.order_number,
        fio: payload.fio,
        restaurant_id: payload.restaurant_id,
        total_price,
        items: payload.items,
        address: payload.address,
        status: OrderStatus::Created,
        created_at: now,
        updated_at: now,
        status_changed_at: now,
        estimated_delivery_at: status::estimated_delivery(now),
        is_deleted: false,
    };

    state.orders.create(&order).await?;
    if let Err(err) = state.events.order_created(&order).await {
        tracing::warn!(order_id = %order.id, error = %err, "order created event not delivered");
    }

    Ok(ApiResponse::success("Order created", order, Some(Meta::empty())))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Order>> {
    let mut order = load_owned(state, user, id).await?;
    status::advance(state.clock.now(), &mut order);

    Ok(ApiResponse::success("OK", order, Some(Meta::empty())))
}

pub async fn get_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderStatusView>> {
    let order = get_order(state, user, id)
        .await?
        .data
        .ok_or(AppError::NotFound)?;

    Ok(ApiResponse::success(
        "OK",
        OrderStatusView {
            order_id: order.id,
            status: order.status,
        },
        Some(Meta::empty()),
    ))
}

/// Caller's live orders created at or after `from`, newest first.
pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    from: Option<DateTime<Utc>>,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_identified(user)?;
    let from = from.unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
    let now = state.clock.now();

    let mut orders: Vec<Order> = state
        .orders
        .list_from(from)
        .await?
        .into_iter()
        .filter(|order| order.user_id == user.user_id)
        .collect();
    for order in &mut orders {
        status::advance(now, order);
    }
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let meta = Meta::with_total(orders.len());
    Ok(ApiResponse::success(
        "Ok",
        OrderList { items: orders },
        Some(meta),
    ))
}

pub async fn update_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderRequest,
) -> AppResult<ApiResponse<Order>> {
    let mut order = load_owned(state, user, id).await?;

    if let Some(order_number) = payload.order_number {
        order.order_number = order_number;
    }
    if let Some(fio) = payload.fio {
        order.fio = fio;
    }
    if let Some(items) = payload.items {
        validate_items(&items)?;
        order.total_price = Order::items_total(&items)?;
        order.items = items;
    }
    if let Some(address) = payload.address {
        order.address = address;
    }

    let now = state.clock.now();
    order.status = OrderStatus::Updated;
    order.status_changed_at = now;
    order.updated_at = now;

    state.orders.update(&order).await?;
    if let Err(err) = state.events.order_updated(&order).await {
        tracing::warn!(order_id = %order.id, error = %err, "order updated event not delivered");
    }

    Ok(ApiResponse::success("Order updated", order, Some(Meta::empty())))
}

pub async fn delete_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<DeleteOrderResponse>> {
    load_owned(state, user, id).await?;
    state.orders.mark_deleted(id, &user.user_id).await?;

    if let Err(err) = state.events.order_deleted(id, &user.user_id).await {
        tracing::warn!(order_id = %id, error = %err, "order deleted event not delivered");
    }

    Ok(ApiResponse::success(
        "Order deleted",
        DeleteOrderResponse {
            id,
            status: OrderStatus::Deleted,
        },
        Some(Meta::empty()),
    ))
}

/// Soft-deleted orders are reported as missing; foreign ones as such.
async fn load_owned(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<Order> {
    ensure_identified(user)?;
    let order = state.orders.get_by_id(id).await?;
    if order.is_deleted {
        return Err(AppError::NotFound);
    }
    if order.user_id != user.user_id {
        return Err(AppError::ForeignOwnership);
    }
    Ok(order)
}

fn ensure_identified(user: &AuthUser) -> AppResult<()> {
    if user.user_id.trim().is_empty() {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

fn validate_items(items: &[Item]) -> AppResult<()> {
    if items.is_empty() {
        return Err(AppError::InvalidInput("at least one item is required".into()));
    }
    for item in items {
        if item.quantity <= 0 {
            return Err(AppError::InvalidInput(format!(
                "quantity for {} must be positive",
                item.food_id
            )));
        }
        if item.price < 0 {
            return Err(AppError::InvalidInput(format!(
                "price for {} must not be negative",
                item.food_id
            )));
        }
    }
    Ok(())
}
