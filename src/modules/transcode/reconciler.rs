use std::sync::Arc;

use tracing::info;

use super::dto::{AssetRecordSnapshot, TranscodeStatusResponse};
use super::output::OutputConvention;
use super::transition::{self, JobOutcome};
use crate::common::error::{PipelineError, PipelineResult};
use crate::infrastructure::transcoder::TranscoderClient;
use crate::modules::asset::repository::AssetStore;

/// Pulls the current job state for an asset and applies it exactly as a
/// pushed notification would be applied.
#[derive(Clone)]
pub struct Reconciler {
    assets: Arc<dyn AssetStore>,
    transcoder: Arc<dyn TranscoderClient>,
    output: OutputConvention,
}

impl Reconciler {
    pub fn new(
        assets: Arc<dyn AssetStore>,
        transcoder: Arc<dyn TranscoderClient>,
        output: OutputConvention,
    ) -> Self {
        Self {
            assets,
            transcoder,
            output,
        }
    }

    pub async fn check(&self, asset_id: &str) -> PipelineResult<TranscodeStatusResponse> {
        let asset = self
            .assets
            .get(asset_id)
            .await?
            .ok_or_else(|| PipelineError::NotFound(format!("Asset {} not found", asset_id)))?;

        let record = AssetRecordSnapshot::from(&asset);

        let job_name = asset.job_correlation_id.clone().ok_or_else(|| {
            PipelineError::NotFound(format!("No transcode job id found for asset {}", asset_id))
        })?;

        info!("Checking status for job: {}", job_name);
        let job = self.transcoder.get_job(&job_name).await?;
        info!("Current job state for asset {}: {}", asset_id, job.state.as_str());

        let outcome = JobOutcome::from_state(&job.state, job.error.clone());
        transition::apply(self.assets.as_ref(), &self.output, asset_id, &outcome).await?;

        let current = self.assets.get(asset_id).await?.unwrap_or(asset);

        Ok(TranscodeStatusResponse {
            asset_id: asset_id.to_string(),
            job_state: job.state.as_str().to_string(),
            status: current.status,
            video_url: current.video_url,
            error: match outcome {
                JobOutcome::Failed { detail } => detail.or(current.job_error),
                _ => None,
            },
            record,
        })
    }
}
