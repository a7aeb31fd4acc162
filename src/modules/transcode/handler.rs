use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{debug, error, info};

use super::dto::TranscodeStatusResponse;
use super::events::UploadEvent;
use crate::common::pubsub::PushEnvelope;
use crate::common::response::{ApiError, ApiResponse, ApiSuccess};
use crate::state::AppState;

const FINALIZE_EVENT: &str = "OBJECT_FINALIZE";

fn decode_envelope(body: &[u8]) -> Option<PushEnvelope> {
    match serde_json::from_slice::<PushEnvelope>(body) {
        Ok(envelope) => Some(envelope),
        Err(e) => {
            error!("Dropping push request with malformed envelope: {}", e);
            None
        }
    }
}

/// Storage upload notifications (Pub/Sub push)
///
/// Always acknowledged; failures are logged and the event dropped.
#[utoipa::path(
    post,
    path = "/api/v1/events/uploads",
    request_body(content = PushEnvelope, content_type = "application/json"),
    responses(
        (status = 204, description = "Event handled or dropped")
    ),
    tag = "Pipeline"
)]
pub async fn receive_upload(State(state): State<AppState>, body: Bytes) -> StatusCode {
    let Some(envelope) = decode_envelope(&body) else {
        return StatusCode::NO_CONTENT;
    };

    if let Some(event_type) = envelope.message.attribute("eventType") {
        if event_type != FINALIZE_EVENT {
            debug!("Ignoring storage event {}", event_type);
            return StatusCode::NO_CONTENT;
        }
    }

    let event = envelope
        .message
        .decode_data()
        .and_then(|data| serde_json::from_slice::<UploadEvent>(&data).map_err(Into::into));

    match event {
        Ok(event) => {
            let outcome = state.transcode.ingest.handle(&event).await;
            debug!("Upload {} handled: {:?}", event.path, outcome);
        }
        Err(e) => error!("Dropping upload notification: {}", e),
    }

    StatusCode::NO_CONTENT
}

/// Transcoder job notifications (Pub/Sub push)
#[utoipa::path(
    post,
    path = "/api/v1/events/transcoder",
    request_body(content = PushEnvelope, content_type = "application/json"),
    responses(
        (status = 204, description = "Notification handled or dropped")
    ),
    tag = "Pipeline"
)]
pub async fn receive_transcoder_update(State(state): State<AppState>, body: Bytes) -> StatusCode {
    let Some(envelope) = decode_envelope(&body) else {
        return StatusCode::NO_CONTENT;
    };

    match envelope.message.decode_data() {
        Ok(data) => {
            info!("Received transcoder update: {}", String::from_utf8_lossy(&data));
            let outcome = state.transcode.callbacks.handle_payload(&data).await;
            debug!("Transcoder update handled: {:?}", outcome);
        }
        Err(e) => error!("Dropping transcoder update: {}", e),
    }

    StatusCode::NO_CONTENT
}

/// Check transcode status
///
/// Pulls the job state from the transcoder and applies it to the asset.
#[utoipa::path(
    get,
    path = "/api/v1/assets/{id}/transcode-status",
    params(
        ("id" = String, Path, description = "Asset ID")
    ),
    responses(
        (status = 200, description = "Current status", body = ApiResponse<TranscodeStatusResponse>),
        (status = 404, description = "Asset or job id not found"),
        (status = 502, description = "Transcoder unavailable"),
        (status = 500, description = "Internal Server Error")
    ),
    tag = "Pipeline"
)]
pub async fn check_transcode_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    match state.transcode.reconciler.check(&id).await {
        Ok(res) => ApiSuccess(ApiResponse::success(res, "Transcode status retrieved"), StatusCode::OK).into_response(),
        Err(e) => {
            error!("Error checking transcode status for {}: {}", id, e);
            ApiError::from(e).into_response()
        }
    }
}
