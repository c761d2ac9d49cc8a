use std::sync::Arc;

use axum::Router;
use axum::extract::{DefaultBodyLimit, Extension};
use axum::routing::{get, post};
use log::info;

use crate::files::PathResolver;
use crate::web::handlers::{dir_ops, file_ops, upload_ops};

/// Process-wide configuration, shared read-only across requests.
pub struct ServerConfig {
    pub resolver: PathResolver,
    pub max_upload_size: Option<u64>,
    pub chunk_size: usize,
}

/// Builds the API router. Kept separate from the serve loop so tests can
/// drive it without a socket.
pub fn router(config: Arc<ServerConfig>) -> Router {
    Router::new()
        .route("/api/list", get(dir_ops::list))
        .route("/api/list/{*path}", get(dir_ops::list))
        .route("/api/view/{*path}", get(file_ops::view))
        .route("/api/download/{*path}", get(file_ops::download))
        .route("/api/upload", post(upload_ops::upload))
        .route("/api/upload/{*path}", post(upload_ops::upload))
        // The upload size cap is enforced by the core against the
        // configured limit, not by the framework's default body limit.
        .layer(DefaultBodyLimit::disable())
        .layer(Extension(config))
}

pub async fn run(config: Arc<ServerConfig>, host: &str, port: u16) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router(config))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown requested");
}
