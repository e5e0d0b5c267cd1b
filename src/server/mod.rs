//! HTTP surface: router, API-key gate wiring, and the serve loop.

pub mod auth;
pub mod handlers;
pub mod response;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::telegram::Messenger;

/// Request bodies above this are refused outright: the 10 MB payload cap
/// plus multipart framing overhead.
const MAX_BODY_BYTES: usize = 12 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub api_key: String,
    pub messenger: Arc<dyn Messenger>,
}

pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/", get(handlers::welcome))
        .route("/start", get(handlers::start))
        .route("/reload", get(handlers::reload))
        .route("/groups", get(handlers::groups))
        .route("/send/{id}/{message}", get(handlers::send_path))
        .route("/send-text", post(handlers::send_text))
        .route("/send-image", post(handlers::send_image))
        .route("/send-file", post(handlers::send_file))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_api_key,
        ))
        // Mounted after the gate: documentation stays reachable without a key.
        .route("/docs", get(handlers::docs));

    Router::new()
        .nest("/api", api)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(bind: &str, port: u16, state: AppState) -> Result<()> {
    let app = build_router(state);
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;

    info!("Server running at http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Dropping the gateway handle disconnects the Telegram client.
    info!("Shutting down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
