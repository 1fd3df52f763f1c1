use crate::api::AppState;
use crate::error::AppError;
use axum::{
    Json,
    body::Bytes,
    extract::{ConnectInfo, FromRequest, FromRequestParts},
    http::{HeaderName, HeaderValue, Request, header, request::Parts},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use std::net::SocketAddr;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

pub const API_KEY_HEADER: HeaderName = HeaderName::from_static("x-api-key");
pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Proof that the request carried the configured shared secret.
#[derive(Debug)]
pub struct ApiKey;

impl FromRequestParts<AppState> for ApiKey {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let provided = parts.headers.get(&API_KEY_HEADER).ok_or(AppError::MissingApiKey)?;

        if provided.as_bytes() != state.config.auth.api_key.as_bytes() {
            let peer = parts.extensions.get::<ConnectInfo<SocketAddr>>().map(|ConnectInfo(addr)| addr.to_string());
            tracing::warn!(peer = peer.as_deref().unwrap_or("unknown"), "Unauthorized request");
            return Err(AppError::InvalidApiKey);
        }

        Ok(Self)
    }
}

/// JSON body extractor that reports malformed payloads as `400 {"error": ..}`.
///
/// A request without a JSON content type or with an empty body yields
/// `T::default()`, so handler validation produces the error message.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: axum::extract::Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.to_ascii_lowercase().contains("json"));
        let bytes = Bytes::from_request(req, state).await.map_err(IntoResponse::into_response)?;

        if !is_json || bytes.trim_ascii().is_empty() {
            return Ok(Self(T::default()));
        }

        let Json(value) = Json::<T>::from_bytes(&bytes)
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()).into_response())?;
        Ok(Self(value))
    }
}

/// Reuses a client-supplied `x-request-id` or generates a UUID v4.
#[derive(Clone, Copy, Debug, Default)]
pub struct MakeRequestUuidOrHeader;

impl MakeRequestId for MakeRequestUuidOrHeader {
    fn make_request_id<B>(&mut self, request: &Request<B>) -> Option<RequestId> {
        if let Some(existing) = request.headers().get(&REQUEST_ID_HEADER).filter(|v| !v.is_empty()) {
            return Some(RequestId::new(existing.clone()));
        }
        HeaderValue::from_str(&Uuid::new_v4().to_string()).ok().map(RequestId::new)
    }
}
