use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use utoipa::ToSchema;

/// Pipeline status of an asset. Stored by name in `media_assets.status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum AssetStatus {
    Processing,
    Ready,
    Error,
}

impl AssetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetStatus::Processing => "Processing",
            AssetStatus::Ready => "Ready",
            AssetStatus::Error => "Error",
        }
    }

    /// Statuses written before upload belong to other systems and map to `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Processing" => Some(AssetStatus::Processing),
            "Ready" => Some(AssetStatus::Ready),
            "Error" => Some(AssetStatus::Error),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AssetStatus::Ready | AssetStatus::Error)
    }
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The slice of the media record this service reads and writes.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct MediaAsset {
    pub id: String,
    pub status: Option<AssetStatus>,
    pub source_uri: Option<String>,
    pub job_correlation_id: Option<String>,
    pub video_url: Option<String>,
    pub job_error: Option<String>,
    #[serde(with = "time::serde::iso8601::option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub last_updated: Option<OffsetDateTime>,
}

impl MediaAsset {
    pub fn is_terminal(&self) -> bool {
        self.status.is_some_and(|s| s.is_terminal())
    }
}

#[derive(Debug, FromRow)]
pub struct AssetRow {
    pub id: String,
    pub status: Option<String>,
    pub source_uri: Option<String>,
    pub transcode_job_id: Option<String>,
    pub video_url: Option<String>,
    pub job_error: Option<String>,
    pub last_updated: Option<OffsetDateTime>,
}

impl From<AssetRow> for MediaAsset {
    fn from(row: AssetRow) -> Self {
        Self {
            id: row.id,
            status: row.status.as_deref().and_then(AssetStatus::parse),
            source_uri: row.source_uri,
            job_correlation_id: row.transcode_job_id,
            video_url: row.video_url,
            job_error: row.job_error,
            last_updated: row.last_updated,
        }
    }
}
