//! Route table and response headers

use std::any::Any;
use std::sync::Arc;
use axum::{
    http::{header, HeaderValue},
    routing::{get, post, MethodRouter},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use crate::analyzer::Locale;
use crate::server::config::{Config, EndpointKind};
use crate::server::error::{panic_response, ApiError};
use crate::server::handlers::{self, AppState};
use crate::server::service::StatusService;

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Builds the router for every configured endpoint plus `/health`.
///
/// Every response is JSON and readable cross-origin, errors and
/// preflights included.
pub fn build(config: &Config, service: Arc<StatusService>) -> Router {
    let locale = service.locale();

    let mut router = Router::new().route("/health", get(handlers::health));
    for endpoint in &config.endpoints {
        tracing::info!("serving {:?} endpoint at {}", endpoint.kind, endpoint.path);
        router = router.route(&endpoint.path, endpoint_route(endpoint.kind, locale));
    }

    router
        .with_state(service)
        .layer(CatchPanicLayer::custom(
            move |panic: Box<dyn Any + Send + 'static>| panic_response(locale, panic),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_TYPE,
            HeaderValue::from_static(JSON_CONTENT_TYPE),
        ))
}

fn endpoint_route(kind: EndpointKind, locale: Locale) -> MethodRouter<AppState> {
    let (route, allowed, allow_header) = match kind {
        EndpointKind::Proxy => (post(handlers::proxy), "POST", "POST, OPTIONS"),
        EndpointKind::Api => (
            get(handlers::api).post(handlers::api),
            "GET, POST",
            "GET, POST, OPTIONS",
        ),
        EndpointKind::Check => (get(handlers::check), "GET", "GET, OPTIONS"),
    };

    route
        .options(handlers::preflight)
        .fallback(move || async move { ApiError::MethodNotAllowed(allowed).respond(locale) })
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(allow_header),
        ))
}
