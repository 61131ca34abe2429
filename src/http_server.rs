//! HTTP server implementation using Axum.

use crate::envelope::{ExecutionResult, STATUS_OK};
use crate::model::Submission;
use crate::state::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Build the router with all routes and layers.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/dfa", post(run_dfa))
        .route("/api/one-way-tm", post(run_one_way_tm))
        .route("/api/two-way-tm", post(run_two_way_tm))
        .route("/api/start", get(start))
        .route("/health", get(health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `port` on all interfaces and serve until `shutdown` resolves.
pub async fn run_server<F>(port: u16, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!("Starting HTTP server on {}", addr);
    serve(listener, state, shutdown).await
}

/// Serve on an already bound listener.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

async fn health() -> &'static str {
    "OK"
}

async fn start() -> Json<Value> {
    Json(json!({ "status": STATUS_OK }))
}

async fn run_dfa(
    State(state): State<AppState>,
    Json(req): Json<Submission>,
) -> Json<ExecutionResult> {
    info!("POST /api/dfa");
    Json(state.dispatcher.dfa(req).await)
}

async fn run_one_way_tm(
    State(state): State<AppState>,
    Json(req): Json<Submission>,
) -> Json<ExecutionResult> {
    info!("POST /api/one-way-tm");
    Json(state.dispatcher.one_way_tm(req).await)
}

async fn run_two_way_tm(
    State(state): State<AppState>,
    Json(req): Json<Submission>,
) -> Json<ExecutionResult> {
    info!("POST /api/two-way-tm");
    Json(state.dispatcher.two_way_tm(req).await)
}
