use crate::config::Config;
use crate::error::internal_error_response;
use crate::services::device_service::DeviceService;
use crate::services::notifier::Notifier;
use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::Request;
use axum::response::Response;
use axum::{
    Router,
    routing::{get, post},
};
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

pub mod devices;
pub mod health;
pub mod middleware;
pub mod notifications;
pub mod schemas;

#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Config,
    pub device_service: DeviceService,
    pub notifier: Notifier,
}

#[derive(Debug)]
pub struct ServiceContainer {
    pub device_service: DeviceService,
    pub notifier: Notifier,
}

/// Configures and returns the application router.
pub fn app_router(config: Config, services: ServiceContainer) -> Router {
    let body_limit = config.server.body_limit_bytes;
    let state = AppState { config, device_service: services.device_service, notifier: services.notifier };

    Router::new()
        .route("/register-device", post(devices::register_device))
        .route("/devices", get(devices::list_devices))
        .route("/send-notification", post(notifications::send_notification))
        .route("/send-personalized-notification", post(notifications::send_personalized_notification))
        .route("/send-appwide-notification", post(notifications::send_appwide_notification))
        .route("/health", get(health::health))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CorsLayer::permissive())
        .layer(PropagateRequestIdLayer::new(middleware::REQUEST_ID_HEADER))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = request
                        .extensions()
                        .get::<tower_http::request_id::RequestId>()
                        .map(|id| id.header_value().to_str().unwrap_or_default())
                        .unwrap_or_default()
                        .to_string();

                    tracing::info_span!(
                        "request",
                        "request_id" = %request_id,
                        "http.request.method" = %request.method(),
                        "url.path" = %request.uri().path(),
                        "http.response.status_code" = tracing::field::Empty,
                        "otel.kind" = "server",
                    )
                })
                .on_response(|response: &axum::http::Response<_>, latency: std::time::Duration, span: &tracing::Span| {
                    let status = response.status();
                    span.record("http.response.status_code", status.as_u16());

                    tracing::info!(
                        latency_ms = %latency.as_millis(),
                        status = %status.as_u16(),
                        "request completed"
                    );
                })
                .on_failure(|error, _latency, _span: &tracing::Span| {
                    tracing::error!(error = %error, "request failed");
                }),
        )
        .layer(SetRequestIdLayer::new(middleware::REQUEST_ID_HEADER, middleware::MakeRequestUuidOrHeader))
        .with_state(state)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("Unknown error");

    tracing::error!(panic = %detail, "Request handler panicked");
    internal_error_response("Internal server error")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_panic_detail_is_not_returned_to_client() {
        let response = handle_panic(Box::new("connection string postgres://secret"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, serde_json::json!({ "success": false, "error": "Internal server error" }));
    }
}
