use utoipa::{
    OpenApi,
    openapi::OpenApi as OpenApiSpec,
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::orders::{
        CreateOrderRequest, DeleteOrderResponse, OrderList, OrderStatusView, UpdateOrderRequest,
    },
    models::{DeliveryAddress, Item, Order, OrderStatus},
    response::{ApiResponse, Meta},
    routes::{debug, health, orders, params},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        orders::create_order,
        orders::get_order,
        orders::get_order_status,
        orders::list_orders,
        orders::update_order,
        orders::delete_order,
        debug::seed_orders
    ),
    components(
        schemas(
            Order,
            OrderStatus,
            Item,
            DeliveryAddress,
            CreateOrderRequest,
            UpdateOrderRequest,
            OrderList,
            OrderStatusView,
            DeleteOrderResponse,
            params::ListOrdersQuery,
            params::SeedQuery,
            health::HealthData,
            Meta,
            ApiResponse<Order>,
            ApiResponse<OrderList>,
            ApiResponse<OrderStatusView>,
            ApiResponse<DeleteOrderResponse>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Orders", description = "Order lifecycle endpoints"),
        (name = "Debug", description = "Demo data endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
