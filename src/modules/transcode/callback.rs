use std::sync::Arc;

use tracing::{error, info, warn};

use super::events::JobNotification;
use super::output::OutputConvention;
use super::transition::{self, Applied};
use crate::modules::asset::repository::AssetStore;

#[derive(Debug, Clone, PartialEq)]
pub enum CallbackOutcome {
    /// Payload could not be decoded into a job notification.
    Rejected(String),
    /// No asset carries this job id.
    Orphaned { job_name: String },
    /// More than one asset carries this job id; nothing applied.
    Ambiguous { job_name: String, matches: usize },
    Applied { asset_id: String, applied: Applied },
    StoreFailure(String),
}

/// Applies pushed job-state notifications to the matching asset.
#[derive(Clone)]
pub struct CallbackHandler {
    assets: Arc<dyn AssetStore>,
    output: OutputConvention,
}

impl CallbackHandler {
    pub fn new(assets: Arc<dyn AssetStore>, output: OutputConvention) -> Self {
        Self { assets, output }
    }

    pub async fn handle_payload(&self, payload: &[u8]) -> CallbackOutcome {
        match JobNotification::decode(payload) {
            Ok(notification) => self.handle(notification).await,
            Err(e) => {
                error!("Dropping transcoder notification: {}", e);
                CallbackOutcome::Rejected(e.to_string())
            }
        }
    }

    pub async fn handle(&self, notification: JobNotification) -> CallbackOutcome {
        let job_name = notification.job_name;

        let mut matches = match self.assets.find_by_job(&job_name).await {
            Ok(matches) => matches,
            Err(e) => {
                error!("Lookup for job {} failed: {}", job_name, e);
                return CallbackOutcome::StoreFailure(e.to_string());
            }
        };

        let asset = match matches.len() {
            0 => {
                warn!("No asset found with job id {}", job_name);
                return CallbackOutcome::Orphaned { job_name };
            }
            1 => matches.remove(0),
            n => {
                error!(
                    "Correlation integrity violation: {} assets share job id {}",
                    n, job_name
                );
                return CallbackOutcome::Ambiguous { job_name, matches: n };
            }
        };

        info!("Matched job {} to asset {}", job_name, asset.id);

        match transition::apply(self.assets.as_ref(), &self.output, &asset.id, &notification.outcome).await {
            Ok(applied) => CallbackOutcome::Applied {
                asset_id: asset.id,
                applied,
            },
            Err(e) => {
                error!("Failed to apply job {} to asset {}: {}", job_name, asset.id, e);
                CallbackOutcome::StoreFailure(e.to_string())
            }
        }
    }
}
