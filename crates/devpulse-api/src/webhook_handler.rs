use crate::{
    caching::clear_caches,
    error::ApiResult,
    extractors::VerifiedWebhookPayload,
    state::AppState,
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::Value;
use tracing::info;

/// Webhook handler: bust both cached payloads so the next request refetches
///
/// The signature is verified by the extractor before this runs. The payload
/// content is not inspected beyond parsing; any verified event invalidates
/// the derived data.
pub async fn handle_webhook(
    State(state): State<AppState>,
    VerifiedWebhookPayload(body): VerifiedWebhookPayload,
) -> ApiResult<impl IntoResponse> {
    let payload: Value = serde_json::from_slice(&body)?;

    let event_action = payload
        .get("action")
        .and_then(|v| v.as_str())
        .unwrap_or("push");
    info!(action = event_action, "webhook received; invalidating caches");

    clear_caches(&state);

    Ok((
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ok",
            "message": "Cache invalidated"
        })),
    ))
}

/// Manual cache invalidation for `POST /api/activity/clear`
pub async fn clear_activity(State(state): State<AppState>) -> impl IntoResponse {
    clear_caches(&state);
    info!("caches cleared by manual refresh");

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "success": true,
            "message": "All caches cleared successfully"
        })),
    )
}
