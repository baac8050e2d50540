pub mod handlers;
pub mod types;

use crate::{Result, config::Config, storage::ImageStore};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::info;

pub fn router(state: handlers::AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/upload", post(handlers::upload))
        .route("/status", get(handlers::status))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: Config) -> Result<()> {
    let upload_dir =
        std::env::var("UPLOAD_DIR").unwrap_or_else(|_| config.server.upload_dir.clone());
    let store = ImageStore::new(&upload_dir).await?;

    let absolute_dir = std::path::absolute(store.dir())?;
    info!(
        "Starting server. Images will be saved to: {}",
        absolute_dir.display()
    );

    let app_state = handlers::AppState {
        store: Arc::new(store),
    };
    let app = router(app_state, config.server.max_upload_bytes);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
