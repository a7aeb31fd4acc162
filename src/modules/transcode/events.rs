use serde::Deserialize;
use thiserror::Error;
use utoipa::ToSchema;

use super::transition::JobOutcome;
use crate::infrastructure::transcoder::model::{error_detail, JobState};

/// Top-level folder uploads must land in. Output is written elsewhere, so
/// this also keeps the pipeline from triggering on its own files.
pub const UPLOAD_PREFIX: &str = "videos";

/// Storage notification for a finalized object.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadEvent {
    pub bucket: String,
    /// Object path inside the bucket (`name` in storage notifications).
    #[serde(alias = "name")]
    pub path: String,
    #[serde(default)]
    pub content_type: Option<String>,
}

/// A validated upload that should be transcoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    pub asset_id: String,
    pub file_name: String,
    pub source_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("content type {0:?} is not video")]
    NotVideo(Option<String>),

    #[error("path {0} is not under videos/{{assetId}}/{{filename}}")]
    OutsideUploadPrefix(String),
}

impl UploadEvent {
    pub fn target(&self) -> Result<UploadTarget, SkipReason> {
        let is_video = self
            .content_type
            .as_deref()
            .and_then(|ct| ct.parse::<mime::Mime>().ok())
            .is_some_and(|m| m.type_() == mime::VIDEO);

        if !is_video {
            return Err(SkipReason::NotVideo(self.content_type.clone()));
        }

        let parts: Vec<&str> = self.path.split('/').collect();
        let outside = || SkipReason::OutsideUploadPrefix(self.path.clone());

        if parts.len() < 3 || parts[0] != UPLOAD_PREFIX {
            return Err(outside());
        }

        let asset_id = parts[1];
        let file_name = parts[parts.len() - 1];
        if asset_id.is_empty() || file_name.is_empty() {
            return Err(outside());
        }

        Ok(UploadTarget {
            asset_id: asset_id.to_string(),
            file_name: file_name.to_string(),
            source_uri: format!("gs://{}/{}", self.bucket, self.path),
        })
    }
}

#[derive(Debug, Deserialize)]
struct CallbackMessage {
    job: Option<CallbackJob>,
}

#[derive(Debug, Deserialize)]
struct CallbackJob {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

/// A decoded job-state notification.
#[derive(Debug, Clone, PartialEq)]
pub struct JobNotification {
    pub job_name: String,
    pub outcome: JobOutcome,
}

#[derive(Debug, Error)]
pub enum CallbackRejection {
    #[error("notification is not JSON: {0}")]
    NotJson(#[from] serde_json::Error),

    #[error("notification has no job name")]
    MissingJobName,
}

impl JobNotification {
    pub fn decode(payload: &[u8]) -> Result<Self, CallbackRejection> {
        let message: CallbackMessage = serde_json::from_slice(payload)?;

        let job = message.job.ok_or(CallbackRejection::MissingJobName)?;
        let job_name = job
            .name
            .filter(|n| !n.is_empty())
            .ok_or(CallbackRejection::MissingJobName)?;

        let state = JobState::parse(job.state.as_deref().unwrap_or_default());
        let detail = job.error.as_ref().map(error_detail);

        Ok(Self {
            job_name,
            outcome: JobOutcome::from_state(&state, detail),
        })
    }
}
