use crate::api::AppState;
use crate::api::middleware::ApiJson;
use crate::api::schemas::devices::{DevicesResponse, RegisterDeviceRequest, RegisterDeviceResponse};
use crate::error::Result;
use axum::{Json, extract::State};

/// Registers a device token, optionally under a user id.
///
/// # Errors
/// Returns `AppError::BadRequest` if the token is missing or empty.
pub async fn register_device(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterDeviceRequest>,
) -> Result<Json<RegisterDeviceResponse>> {
    let user_id = payload.user_id();
    let total_devices = state.device_service.register_device(payload.token.as_deref().unwrap_or_default(), user_id)?;

    Ok(Json(RegisterDeviceResponse {
        success: true,
        message: "Device registered successfully".to_string(),
        total_devices,
        user_id: user_id.unwrap_or("anonymous").to_string(),
    }))
}

/// Dumps every registered token.
pub async fn list_devices(State(state): State<AppState>) -> Json<DevicesResponse> {
    let devices = state.device_service.devices();
    Json(DevicesResponse { count: devices.len(), devices })
}
