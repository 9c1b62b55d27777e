pub mod events;
pub mod health;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use evdir_core::EvdirError;

/// Standard API error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    fn reply(status: StatusCode, message: &str) -> Response {
        let body = Json(ErrorResponse {
            error: message.to_string(),
        });
        (status, body).into_response()
    }
}

/// Convert anyhow errors to HTTP responses.
///
/// The full error chain goes to the log; the client only gets a generic
/// message, never file paths or parser details.
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match self.0.downcast_ref::<EvdirError>() {
            Some(EvdirError::StoreUnavailable { .. }) => "Event store unavailable",
            _ => "Internal Server Error",
        };
        tracing::error!("Request failed: {:#}", self.0);
        ErrorResponse::reply(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

/// Fallback for unmatched `/api/*` paths
pub async fn api_not_found() -> Response {
    ErrorResponse::reply(StatusCode::NOT_FOUND, "API route not found")
}
