//! Errors that end a request early
//!
//! Each variant maps to one HTTP status and a JSON body. Messages are
//! localized at response time, so the error itself carries no text meant
//! for clients.

use std::any::Any;
use std::fmt;
use std::fmt::Display;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use crate::analyzer::{Locale, OverallStatus};
use crate::server::models::StatusResponse;
use crate::upstream::UpstreamError;

#[derive(Debug)]
pub enum ApiError {
    /// Proxy request arrived without a body to forward
    EmptyRequestBody,

    /// Method not served by the endpoint; carries the allowed list
    MethodNotAllowed(&'static str),

    /// Upstream failed and nothing was cached to fall back on
    Upstream(UpstreamError),

    /// Unexpected failure while building a response
    Internal(String),
}

impl std::error::Error for ApiError {}

impl Display for ApiError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::EmptyRequestBody => "empty request body".fmt(fmt),
            ApiError::MethodNotAllowed(allowed) => write!(fmt, "method not allowed, use {}", allowed),
            ApiError::Upstream(e) => write!(fmt, "upstream failed with no cache: {}", e),
            ApiError::Internal(e) => write!(fmt, "internal error: {}", e),
        }
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::EmptyRequestBody => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn respond(self, locale: Locale) -> Response {
        let texts = locale.texts();
        let status = self.status_code();
        match self {
            ApiError::EmptyRequestBody => {
                (status, Json(serde_json::json!({ "error": texts.empty_request_body })))
                    .into_response()
            }
            ApiError::MethodNotAllowed(allowed) => (
                status,
                Json(serde_json::json!({ "error": texts.method_not_allowed(allowed) })),
            )
                .into_response(),
            ApiError::Upstream(e) => (
                status,
                Json(serde_json::json!({
                    "error": texts.upstream_failed,
                    "code": e.code(),
                })),
            )
                .into_response(),
            // keeps the status shape so dashboards need no separate error path
            ApiError::Internal(detail) => (
                status,
                Json(StatusResponse::without_data(
                    OverallStatus::Error,
                    texts.internal(&detail),
                )),
            )
                .into_response(),
        }
    }
}

/// Converts a handler panic into the fixed-shape 500 body.
pub fn panic_response(locale: Locale, panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    tracing::error!("request handler panicked: {}", detail);
    ApiError::Internal(detail).respond(locale)
}
