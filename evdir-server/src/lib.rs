//! HTTP surface for evdir.
//!
//! `/api/events` and `/api/health` are served from `routes`; any other
//! `/api` path is a JSON 404, and everything else is the browser client,
//! with unknown paths falling back to its `index.html`.

pub mod routes;
pub mod state;

use std::path::Path;
use std::time::Duration;

use axum::Router;
use evdir_core::EvdirConfig;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub use crate::state::AppState;

/// Router wired from configuration: data file, client directory, default page
/// size and request timeout.
pub fn app(config: &EvdirConfig) -> Router {
    build_router(
        AppState::from_config(config),
        &config.public_dir_path(),
        config.request_timeout(),
    )
}

pub fn build_router(state: AppState, public_dir: &Path, request_timeout: Duration) -> Router {
    let api = Router::new()
        .merge(routes::events::router())
        .merge(routes::health::router())
        .fallback(routes::api_not_found);

    let client = ServeDir::new(public_dir).fallback(ServeFile::new(public_dir.join("index.html")));

    Router::new()
        .nest("/api", api)
        .fallback_service(client)
        .with_state(state)
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
