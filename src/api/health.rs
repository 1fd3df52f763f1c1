use crate::api::AppState;
use crate::api::schemas::health::HealthResponse;
use axum::{Json, extract::State};

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok".to_string(), registered_devices: state.device_service.device_count() })
}
