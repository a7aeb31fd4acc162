use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::events::{SkipReason, UploadEvent};
use super::job_builder::JobBuilder;
use super::submitter::{JobSubmitter, SubmitOutcome};
use crate::modules::asset::repository::AssetStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// Not a video upload under the upload prefix.
    Skipped(SkipReason),
    /// A job was already submitted or claimed for this asset, or it is
    /// terminal.
    Duplicate { asset_id: String },
    /// The submission claim could not be written; nothing was submitted.
    StoreFailure { asset_id: String, detail: String },
    /// No record exists to reconcile the result into.
    UnknownAsset { asset_id: String },
    Dispatched { asset_id: String, result: SubmitOutcome },
}

/// Reacts to finalized uploads by starting one transcode job per asset.
#[derive(Clone)]
pub struct IngestHandler {
    assets: Arc<dyn AssetStore>,
    builder: JobBuilder,
    submitter: JobSubmitter,
}

impl IngestHandler {
    pub fn new(assets: Arc<dyn AssetStore>, builder: JobBuilder, submitter: JobSubmitter) -> Self {
        Self {
            assets,
            builder,
            submitter,
        }
    }

    pub async fn handle(&self, event: &UploadEvent) -> IngestOutcome {
        let target = match event.target() {
            Ok(target) => target,
            Err(reason) => {
                debug!("Ignoring upload {}/{}: {}", event.bucket, event.path, reason);
                return IngestOutcome::Skipped(reason);
            }
        };

        let asset_id = target.asset_id.clone();
        info!("Starting transcode for asset: {}, file: {}", asset_id, target.file_name);

        // Upload notifications are redelivered; only the first may submit.
        match self.assets.get(&asset_id).await {
            Ok(Some(asset)) if asset.job_correlation_id.is_some() || asset.is_terminal() => {
                info!(
                    "Asset {} already has job {:?} (status {:?}); not resubmitting",
                    asset_id, asset.job_correlation_id, asset.status
                );
                return IngestOutcome::Duplicate { asset_id };
            }
            Ok(Some(_)) => {}
            Ok(None) => {
                warn!("No media record for asset {}; upload ignored", asset_id);
                return IngestOutcome::UnknownAsset { asset_id };
            }
            Err(e) => warn!("Could not load asset {} before submit: {}", asset_id, e),
        }

        // Concurrent deliveries can all pass the read above; the claim admits one.
        match self.assets.claim_submission(&asset_id).await {
            Ok(true) => {}
            Ok(false) => {
                info!("Asset {} already claimed for submission; skipping", asset_id);
                return IngestOutcome::Duplicate { asset_id };
            }
            Err(e) => {
                error!("Could not claim asset {} for submission: {}", asset_id, e);
                return IngestOutcome::StoreFailure {
                    asset_id,
                    detail: e.to_string(),
                };
            }
        }

        match self.assets.mark_processing(&asset_id).await {
            Ok(true) => debug!("Asset {} marked Processing", asset_id),
            Ok(false) => warn!("Asset {} was not moved to Processing", asset_id),
            Err(e) => warn!("Failed to update status for asset {}: {}", asset_id, e),
        }

        let spec = self.builder.build(&asset_id, &target.source_uri);
        let result = self.submitter.submit(&asset_id, &spec).await;

        IngestOutcome::Dispatched { asset_id, result }
    }
}
