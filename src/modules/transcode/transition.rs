//! Terminal transitions shared by the push (callback) and pull (reconcile)
//! paths. The target state depends only on the job outcome and the output
//! convention, so repeated or racing deliveries converge on the same record.

use tracing::{debug, error, info, warn};

use super::output::OutputConvention;
use crate::infrastructure::transcoder::model::JobState;
use crate::modules::asset::model::AssetStatus;
use crate::modules::asset::repository::{AssetStore, StoreError};

#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Succeeded,
    Failed { detail: Option<String> },
    /// Any non-terminal state; not modelled further.
    Pending { state: String },
}

impl JobOutcome {
    pub fn from_state(state: &JobState, detail: Option<String>) -> Self {
        match state {
            JobState::Succeeded => JobOutcome::Succeeded,
            JobState::Failed => JobOutcome::Failed { detail },
            other => JobOutcome::Pending {
                state: other.as_str().to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    Ready { video_url: String },
    Error { detail: Option<String> },
    Unchanged,
}

impl Transition {
    pub fn resolve(outcome: &JobOutcome, output: &OutputConvention, asset_id: &str) -> Self {
        match outcome {
            JobOutcome::Succeeded => Transition::Ready {
                video_url: output.playback_url(asset_id),
            },
            JobOutcome::Failed { detail } => Transition::Error {
                detail: detail.clone(),
            },
            JobOutcome::Pending { .. } => Transition::Unchanged,
        }
    }

    pub fn target_status(&self) -> Option<AssetStatus> {
        match self {
            Transition::Ready { .. } => Some(AssetStatus::Ready),
            Transition::Error { .. } => Some(AssetStatus::Error),
            Transition::Unchanged => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    pub transition: Transition,
    /// False when the write was skipped because the record was already
    /// terminal (or vanished). A repeated success is reported this way.
    pub written: bool,
}

pub async fn apply(
    store: &dyn AssetStore,
    output: &OutputConvention,
    asset_id: &str,
    outcome: &JobOutcome,
) -> Result<Applied, StoreError> {
    let transition = Transition::resolve(outcome, output, asset_id);

    let written = match &transition {
        Transition::Ready { video_url } => {
            let written = store.mark_ready(asset_id, video_url).await?;
            if written {
                info!("Asset {} is Ready at {}", asset_id, video_url);
            }
            written
        }
        Transition::Error { detail } => {
            error!(
                "Transcode failed for asset {}: {}",
                asset_id,
                detail.as_deref().unwrap_or("no detail reported")
            );
            store.mark_failed(asset_id, detail.as_deref()).await?
        }
        Transition::Unchanged => {
            debug!("Asset {} job still in progress: {:?}", asset_id, outcome);
            false
        }
    };

    if !written && transition != Transition::Unchanged {
        warn!(
            "Asset {} not moved to {:?}: record missing or already terminal",
            asset_id,
            transition.target_status()
        );
    }

    Ok(Applied { transition, written })
}
