use serde::Serialize;
use utoipa::ToSchema;

use crate::modules::asset::model::{AssetStatus, MediaAsset};

/// Persisted fields as they were read before reconciling.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AssetRecordSnapshot {
    pub status: Option<AssetStatus>,
    pub video_url: Option<String>,
    pub job_id: Option<String>,
}

impl From<&MediaAsset> for AssetRecordSnapshot {
    fn from(asset: &MediaAsset) -> Self {
        Self {
            status: asset.status,
            video_url: asset.video_url.clone(),
            job_id: asset.job_correlation_id.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TranscodeStatusResponse {
    pub asset_id: String,
    /// Raw job state reported by the transcoder, e.g. `RUNNING`.
    pub job_state: String,
    /// Status after reconciliation.
    pub status: Option<AssetStatus>,
    pub video_url: Option<String>,
    pub error: Option<String>,
    pub record: AssetRecordSnapshot,
}
