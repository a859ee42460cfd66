//! HTTP request handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use bytes::Bytes;
use super::service::StatusService;

pub type AppState = Arc<StatusService>;

/// Health check endpoint
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "upstat"
    }))
}

/// CORS preflight, answered for every endpoint
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Raw pass-through endpoint
pub async fn proxy(State(service): State<AppState>, body: Bytes) -> Response {
    match service.proxy(body).await {
        Ok(raw) => (StatusCode::OK, raw).into_response(),
        Err(e) => {
            tracing::warn!("proxy request failed: {}", e);
            e.respond(service.locale())
        }
    }
}

/// Analyzed endpoint, refreshing from upstream when the cache is cold
pub async fn api(State(service): State<AppState>) -> Json<super::models::StatusResponse> {
    Json(service.api().await)
}

/// Analyzed endpoint reading the cache only
pub async fn check(State(service): State<AppState>) -> Json<super::models::StatusResponse> {
    Json(service.check().await)
}
