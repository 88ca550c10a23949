use axum::http::{HeaderName, Request, Response};
use tokio_util::sync::CancellationToken;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use food_order_service::{
    clock::{Clock, SystemClock},
    config::{AppConfig, EventSinkKind, StorageBackend},
    db::{create_orm_conn, create_pool, run_migrations},
    events::{BroadcastEventSink, EventSink, LogEventSink, relay_to_log},
    repository::{OrderRepository, OrderStore, PgOrderRepository, StatusAdvancer},
    routes,
    state::AppState,
    worker::AdvancementWorker,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,food_order_service=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let (orders, advancer) = match config.storage {
        StorageBackend::Memory => {
            let store = Arc::new(OrderStore::new(clock.clone()));
            (
                store.clone() as Arc<dyn OrderRepository>,
                store as Arc<dyn StatusAdvancer>,
            )
        }
        StorageBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is not set")?;
            let pool = create_pool(database_url).await?;
            run_migrations(&pool).await?;
            let repo = Arc::new(PgOrderRepository::new(create_orm_conn(pool), clock.clone()));
            (
                repo.clone() as Arc<dyn OrderRepository>,
                repo as Arc<dyn StatusAdvancer>,
            )
        }
    };

    let events: Arc<dyn EventSink> = match config.event_sink {
        EventSinkKind::Log => Arc::new(LogEventSink),
        EventSinkKind::Broadcast => {
            let sink = BroadcastEventSink::new(
                config.event_topic.clone(),
                config.event_channel_capacity,
                clock.clone(),
            );
            tokio::spawn(relay_to_log(sink.subscribe(), sink.topic().to_string()));
            Arc::new(sink)
        }
    };

    let shutdown = CancellationToken::new();
    let worker = AdvancementWorker::new(advancer, events.clone(), clock.clone(), config.status_tick);
    let worker_handle = tokio::spawn(worker.run(shutdown.clone()));

    let state = AppState {
        orders,
        events,
        clock,
        backend: config.storage,
    };

    let concurrency_limit_layer = ConcurrencyLimitLayer::new(100);

    let request_id_header = HeaderName::from_static("x-request-id");
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<_>| {
            let request_id = request
                .headers()
                .get("x-request-id")
                .and_then(|value| value.to_str().ok())
                .unwrap_or("-");
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                request_id = %request_id
            )
        })
        .on_response(|response: &Response<_>, latency: Duration, _span: &tracing::Span| {
            tracing::info!(
                status = %response.status(),
                ms = %latency.as_millis(),
                "request finished"
            );
        });

    let app = routes::app(state, config.debug_routes)
        .layer(trace_layer)
        .layer(PropagateRequestIdLayer::new(
            request_id_header.clone(),
        ))
        .layer(SetRequestIdLayer::new(
            request_id_header,
            MakeRequestUuid,
        ))
        .layer(RequestBodyLimitLayer::new(1024 * 1024))
        .layer(concurrency_limit_layer);

    let addr = SocketAddr::from((config.host.parse::<std::net::IpAddr>()?, config.port));
    tracing::info!(storage = config.storage.as_str(), "listening on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app)
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .await?;

    shutdown.cancel();
    worker_handle.await?;

    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("shutdown requested");
        }
        () = shutdown.cancelled() => {}
    }
    shutdown.cancel();
}
