//! HTTP server module
//!
//! Serves the three search endpoints, the random/webring redirects, the
//! about and filtered pages, and static assets. The index file is opened
//! read-only per request; ingest runs own it exclusively.

mod handlers;
mod theme;
mod views;

pub use theme::write_theme;
pub use views::humanize;

use crate::config::Config;
use crate::storage::IndexStorage;
use crate::{LieuError, Result};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

/// Shared state for request handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    db_path: PathBuf,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let db_path = PathBuf::from(&config.data.database);
        Self {
            config: Arc::new(config),
            db_path,
        }
    }

    /// Opens a read-only connection to the index for this request
    pub fn index(&self) -> std::result::Result<IndexStorage, AppError> {
        IndexStorage::open_read_only(&self.db_path).map_err(|e| AppError(e.into()))
    }
}

/// Handler-level error: everything surfaces as a 500
///
/// Broken client pipes never reach here; hyper logs and drops them at the
/// connection layer.
pub struct AppError(pub LieuError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!("request failed: {}", self.0);
        (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            "internal error".to_string(),
        )
            .into_response()
    }
}

impl From<crate::storage::StorageError> for AppError {
    fn from(e: crate::storage::StorageError) -> Self {
        Self(e.into())
    }
}

/// Builds the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::search_route))
        .route("/paragraph", get(handlers::paragraph_route))
        .route("/outgoing", get(handlers::outgoing_route))
        .route("/random", get(handlers::random_route))
        .route("/random/outgoing", get(handlers::random_outgoing_route))
        .route("/webring", get(handlers::webring_route))
        .route("/about", get(handlers::about_route))
        .route("/filtered", get(handlers::filtered_route))
        .nest_service("/assets", ServeDir::new("html/assets"))
        .route_service("/robots.txt", ServeFile::new("html/robots.txt"))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Writes the theme stylesheet and serves the search engine
pub async fn run_server(config: Config) -> Result<()> {
    write_theme(&config, Path::new("html/assets"))?;

    let port = config.general.port;
    let state = AppState::new(config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .map_err(|source| LieuError::Bind { port, source })?;

    tracing::info!("listening on port {}", port);
    axum::serve(listener, app).await.map_err(LieuError::Io)
}
