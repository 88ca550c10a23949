use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::post,
};

use crate::{
    dto::orders::OrderList,
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::params::SeedQuery,
    services::seed_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/debug/seed", post(seed_orders))
}

#[utoipa::path(
    post,
    path = "/public/api/v1/debug/seed",
    params(SeedQuery),
    responses(
        (status = 201, description = "Demo orders created for the caller", body = ApiResponse<OrderList>),
        (status = 401, description = "Missing user identity"),
    ),
    tag = "Debug"
)]
pub async fn seed_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<SeedQuery>,
) -> AppResult<(StatusCode, Json<ApiResponse<OrderList>>)> {
    let resp = seed_service::seed_orders(&state, &user, query.n).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}
