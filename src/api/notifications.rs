use crate::api::AppState;
use crate::api::middleware::{ApiJson, ApiKey};
use crate::api::schemas::notifications::{
    AppwideNotificationRequest, PersonalizedNotificationRequest, SendNotificationRequest, SendNotificationResponse,
};
use crate::error::{AppError, Result};
use axum::{Json, extract::State};

const NO_DEVICES: &str = "No devices registered. Notification queued.";

/// Broadcasts a notification to every registered device.
///
/// # Errors
/// Returns `AppError::MissingApiKey` or `AppError::InvalidApiKey` if the API key check fails.
pub async fn send_notification(
    _key: ApiKey,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<SendNotificationRequest>,
) -> Result<Json<SendNotificationResponse>> {
    let content = payload.content();
    let targets = state.device_service.resolve_targets(None);
    tracing::info!(title = %content.title, body = %content.body, devices = targets.len(), "Sending notification");

    if targets.is_empty() {
        return Ok(Json(SendNotificationResponse::queued(NO_DEVICES)));
    }

    let report = state.notifier.send_batch(&targets, None, &content, payload.data()).await;
    Ok(Json(SendNotificationResponse::sent("Notifications sent", &report, content)))
}

/// Sends a notification to the devices registered under one user.
///
/// # Errors
/// Returns `AppError::BadRequest` if `userId` is missing.
/// Returns `AppError::MissingApiKey` or `AppError::InvalidApiKey` if the API key check fails.
pub async fn send_personalized_notification(
    _key: ApiKey,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<PersonalizedNotificationRequest>,
) -> Result<Json<SendNotificationResponse>> {
    let user_id = payload.validate().map_err(AppError::BadRequest)?;
    let targets = state.device_service.resolve_targets(Some(user_id));

    if targets.is_empty() {
        return Ok(Json(
            SendNotificationResponse::queued("No devices registered for this user. Notification queued.")
                .for_user(user_id, None),
        ));
    }

    let content = payload.content();
    tracing::info!(
        user_id = %user_id,
        title = %content.title,
        body = %content.body,
        devices = targets.len(),
        "Sending personalized notification"
    );

    let report = state.notifier.send_batch(&targets, Some(user_id), &content, payload.data(user_id)).await;
    if !report.has_valid_targets() {
        return Ok(Json(SendNotificationResponse::queued("No valid devices for this user.").for_user(user_id, None)));
    }

    Ok(Json(
        SendNotificationResponse::sent("Personalized notifications sent", &report, content)
            .for_user(user_id, payload.username.clone()),
    ))
}

/// Sends an announcement to every registered device.
///
/// # Errors
/// Returns `AppError::MissingApiKey` or `AppError::InvalidApiKey` if the API key check fails.
pub async fn send_appwide_notification(
    _key: ApiKey,
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<AppwideNotificationRequest>,
) -> Result<Json<SendNotificationResponse>> {
    let content = payload.content();
    let targets = state.device_service.resolve_targets(None);
    tracing::info!(title = %content.title, body = %content.body, devices = targets.len(), "Sending app-wide notification");

    if targets.is_empty() {
        return Ok(Json(SendNotificationResponse::queued(NO_DEVICES)));
    }

    let report = state.notifier.send_batch(&targets, None, &content, AppwideNotificationRequest::data()).await;
    Ok(Json(SendNotificationResponse::sent("App-wide notifications sent", &report, content)))
}
