use std::sync::Arc;

use tracing::{error, info};

use crate::infrastructure::transcoder::model::JobSpec;
use crate::infrastructure::transcoder::TranscoderClient;
use crate::modules::asset::repository::AssetStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Job created and its name stored as the correlation id.
    Submitted { job_name: String },
    /// The service refused or could not be reached; asset moved to Error.
    Rejected { detail: String },
    /// Job created but its name could not be stored; asset moved to Error.
    Uncorrelated { job_name: String, detail: String },
    /// Job created but the asset already had a correlation id, which is
    /// left untouched. The new job will never be matched.
    Orphaned { job_name: String },
}

#[derive(Clone)]
pub struct JobSubmitter {
    assets: Arc<dyn AssetStore>,
    transcoder: Arc<dyn TranscoderClient>,
}

impl JobSubmitter {
    pub fn new(assets: Arc<dyn AssetStore>, transcoder: Arc<dyn TranscoderClient>) -> Self {
        Self { assets, transcoder }
    }

    /// Single attempt, no retry.
    pub async fn submit(&self, asset_id: &str, spec: &JobSpec) -> SubmitOutcome {
        let job_name = match self.transcoder.create_job(spec).await {
            Ok(name) => name,
            Err(e) => {
                let detail = format!("job submission failed: {}", e);
                error!("Error creating transcoder job for asset {}: {}", asset_id, e);
                self.fail(asset_id, &detail).await;
                return SubmitOutcome::Rejected { detail };
            }
        };

        info!("Transcoder job created for asset {}: {}", asset_id, job_name);

        match self.assets.record_job(asset_id, &job_name).await {
            Ok(true) => SubmitOutcome::Submitted { job_name },
            Ok(false) => {
                error!(
                    "Asset {} already has a correlation id (or is gone); job {} is orphaned",
                    asset_id, job_name
                );
                SubmitOutcome::Orphaned { job_name }
            }
            Err(e) => {
                let detail = format!("could not store job id {}: {}", job_name, e);
                error!("Failed to persist job id for asset {}: {}", asset_id, e);
                self.fail(asset_id, &detail).await;
                SubmitOutcome::Uncorrelated { job_name, detail }
            }
        }
    }

    async fn fail(&self, asset_id: &str, detail: &str) {
        if let Err(e) = self.assets.mark_failed(asset_id, Some(detail)).await {
            error!("Failed to mark asset {} as Error: {}", asset_id, e);
        }
    }
}
