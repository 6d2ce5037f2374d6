use axum::{
    Json, Router, middleware as axum_middleware,
    routing::{get, post},
};
use std::{future::Future, sync::Arc};

use crate::{categories, expenses, middleware, statistics};
use api_types::Health;
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        message: "service is running".to_string(),
    })
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/expenses", post(expenses::create).get(expenses::list))
        .route(
            "/api/expenses/{id}",
            get(expenses::get)
                .put(expenses::update)
                .delete(expenses::delete),
        )
        .route("/api/stats", get(statistics::get_stats))
        .route("/api/categories", get(categories::list))
        .layer(axum_middleware::from_fn(middleware::cors))
        .layer(axum_middleware::from_fn(middleware::log_requests))
        .with_state(state)
}

/// Build the HTTP application around an engine.
pub fn app(engine: Arc<Engine>) -> Router {
    router(ServerState { engine })
}

/// Serve until `shutdown` resolves.
pub async fn run_with_listener<F>(
    engine: Engine,
    listener: tokio::net::TcpListener,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(Arc::new(engine)))
        .with_graceful_shutdown(shutdown)
        .await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener, std::future::pending()).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
