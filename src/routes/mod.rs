use axum::{Router, http::Uri, routing::get};

use crate::{error::AppError, state::AppState};

pub mod debug;
pub mod doc;
pub mod health;
pub mod orders;
pub mod params;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router(debug_routes: bool) -> Router<AppState> {
    let router = Router::new().merge(orders::router());
    if debug_routes {
        router.merge(debug::router())
    } else {
        router
    }
}

/// Full application router: health, docs and the order API under
/// `/public/api/v1`. Transport layers are added by the binary.
pub fn app(state: AppState, debug_routes: bool) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/public/api/v1", create_api_router(debug_routes))
        .merge(doc::scalar_docs())
        .fallback(not_found)
        .with_state(state)
}

async fn not_found(uri: Uri) -> AppError {
    tracing::debug!(path = %uri.path(), "no route");
    AppError::NotFound
}
