use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::error;
use validator::Validate;

use super::dto::{FileListResponse, ForceUpdateQuery, ListFilesQuery};
use super::service::{DiagnosticOutcome, ForceUpdate};
use crate::common::error::PipelineError;
use crate::common::response::{ApiError, ApiResponse, ApiSuccess, PlainText};
use crate::modules::transcode::output::OUTPUT_PREFIX;
use crate::state::AppState;

/// Locate the active namespace and optionally force an asset to Ready
#[utoipa::path(
    get,
    path = "/api/v1/diagnostics/force-update",
    params(ForceUpdateQuery),
    responses(
        (status = 200, description = "Probe report or update confirmation", body = String, content_type = "text/plain"),
        (status = 400, description = "Invalid override URL"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Asset not found in the active namespace"),
        (status = 500, description = "No usable namespace or update failed")
    ),
    tag = "Diagnostics",
    security(("bearer_auth" = []))
)]
pub async fn force_update(
    State(state): State<AppState>,
    Query(query): Query<ForceUpdateQuery>,
) -> impl IntoResponse {
    if let Err(e) = query.validate() {
        return PlainText(StatusCode::BAD_REQUEST, e.to_string()).into_response();
    }

    let update = match ForceUpdate::from_parts(query.asset_id, query.hls_url) {
        Ok(update) => update,
        Err(PipelineError::InvalidInput(msg)) => {
            return PlainText(StatusCode::BAD_REQUEST, msg).into_response();
        }
        Err(e) => return PlainText(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    };

    let report = state.diagnostics.run(update).await;
    let status = match &report.outcome {
        DiagnosticOutcome::ProbeOnly { .. } | DiagnosticOutcome::Updated { .. } => StatusCode::OK,
        DiagnosticOutcome::AssetNotFound { .. } => StatusCode::NOT_FOUND,
        DiagnosticOutcome::Failure | DiagnosticOutcome::UpdateFailed { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    PlainText(status, report.render()).into_response()
}

/// List transcoder output objects in the media bucket
#[utoipa::path(
    get,
    path = "/api/v1/diagnostics/files",
    params(ListFilesQuery),
    responses(
        (status = 200, description = "Object keys under the prefix", body = ApiResponse<FileListResponse>),
        (status = 400, description = "Bad Request"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Storage error")
    ),
    tag = "Diagnostics",
    security(("bearer_auth" = []))
)]
pub async fn list_files(
    State(state): State<AppState>,
    Query(query): Query<ListFilesQuery>,
) -> impl IntoResponse {
    if let Err(e) = query.validate() {
        return ApiError(e.to_string(), StatusCode::BAD_REQUEST).into_response();
    }

    let prefix = query
        .prefix
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| format!("{}/", OUTPUT_PREFIX));

    match state.storage.list_files(&prefix).await {
        Ok(files) => ApiSuccess(
            ApiResponse::success(FileListResponse { prefix, files }, "Files retrieved successfully"),
            StatusCode::OK,
        )
        .into_response(),
        Err(e) => {
            error!("Failed to list files under {}: {}", prefix, e);
            ApiError(e.to_string(), StatusCode::INTERNAL_SERVER_ERROR).into_response()
        }
    }
}
