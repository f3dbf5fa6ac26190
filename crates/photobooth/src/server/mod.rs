//! HTTP API: submit, fetch and delete photos.

mod error;
mod handlers;
mod types;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use photobooth_core::{PhotoService, Photobooth, SubmissionPublisher};
use std::future::Future;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use handlers::*;

/// State shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub publisher: Arc<SubmissionPublisher>,
    pub photos: Arc<PhotoService>,
    /// Deployment mode reported by the health check
    pub mode: Arc<str>,
}

impl AppState {
    pub fn new(booth: &Photobooth) -> Self {
        Self {
            publisher: Arc::new(booth.publisher()),
            photos: Arc::new(booth.photos()),
            mode: Arc::from(booth.config().server.mode.as_str()),
        }
    }
}

/// Build the API router with all endpoints
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/hello", get(hello))
        .route("/health-check", get(health_check))
        .route("/api/photo", post(create_photo))
        .route("/api/photo/{id}", get(get_photo).delete(delete_photo))
        // Middleware
        // Photos arrive base64-encoded in the JSON body; no size cap here.
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve until `shutdown` resolves.
pub async fn start_server<F>(addr: &str, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    serve(listener, state, shutdown).await
}

/// Serve on an already-bound listener until `shutdown` resolves.
pub async fn serve<F>(
    listener: tokio::net::TcpListener,
    state: AppState,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let local = listener.local_addr()?;
    tracing::info!("Listening on http://{}", local);
    tracing::debug!("http://{}/health-check", local);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
