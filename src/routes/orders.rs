use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::orders::{
        CreateOrderRequest, DeleteOrderResponse, OrderList, OrderStatusView, UpdateOrderRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Order,
    response::ApiResponse,
    routes::params::{ListOrdersQuery, parse_order_id},
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/order", post(create_order))
        .route(
            "/order/{id}",
            get(get_order).put(update_order).delete(delete_order),
        )
        .route("/order/{id}/status", get(get_order_status))
        .route("/orders", get(list_orders))
}

#[utoipa::path(
    post,
    path = "/public/api/v1/order",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = ApiResponse<Order>),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Missing user identity"),
    ),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Order>>)> {
    let resp = order_service::create_order(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/public/api/v1/order/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order with its current status", body = ApiResponse<Order>),
        (status = 403, description = "Order belongs to another user"),
        (status = 404, description = "Not Found"),
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let id: Uuid = parse_order_id(&id)?;
    let resp = order_service::get_order(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/public/api/v1/order/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Current order status", body = ApiResponse<OrderStatusView>),
        (status = 403, description = "Order belongs to another user"),
        (status = 404, description = "Not Found"),
    ),
    tag = "Orders"
)]
pub async fn get_order_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<OrderStatusView>>> {
    let id: Uuid = parse_order_id(&id)?;
    let resp = order_service::get_order_status(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/public/api/v1/orders",
    params(ListOrdersQuery),
    responses(
        (status = 200, description = "Caller's orders created since `from`", body = ApiResponse<OrderList>),
        (status = 400, description = "Malformed `from`"),
    ),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ListOrdersQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let from = query.cutoff()?;
    let resp = order_service::list_orders(&state, &user, from).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/public/api/v1/order/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Order updated", body = ApiResponse<Order>),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Order belongs to another user"),
        (status = 404, description = "Not Found"),
    ),
    tag = "Orders"
)]
pub async fn update_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateOrderRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let id: Uuid = parse_order_id(&id)?;
    let resp = order_service::update_order(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/public/api/v1/order/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order soft-deleted", body = ApiResponse<DeleteOrderResponse>),
        (status = 403, description = "Order belongs to another user"),
        (status = 404, description = "Not Found"),
    ),
    tag = "Orders"
)]
pub async fn delete_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<DeleteOrderResponse>>> {
    let id: Uuid = parse_order_id(&id)?;
    let resp = order_service::delete_order(&state, &user, id).await?;
    Ok(Json(resp))
}
