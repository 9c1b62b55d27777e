use axum::{Json, Router, routing::get};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::state::AppState;

pub const SERVICE_NAME: &str = "evdir";

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub service: &'static str,
    pub time: String,
}

/// GET /health - Liveness probe
async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        service: SERVICE_NAME,
        time: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
    })
}
