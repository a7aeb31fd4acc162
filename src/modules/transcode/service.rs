use std::sync::Arc;

use super::callback::CallbackHandler;
use super::ingest::IngestHandler;
use super::job_builder::{EncodePolicy, JobBuilder};
use super::output::OutputConvention;
use super::reconciler::Reconciler;
use super::submitter::JobSubmitter;
use crate::infrastructure::transcoder::TranscoderClient;
use crate::modules::asset::repository::AssetStore;

/// The pipeline components wired to one store and one transcoder client.
#[derive(Clone)]
pub struct TranscodeService {
    pub ingest: IngestHandler,
    pub callbacks: CallbackHandler,
    pub reconciler: Reconciler,
}

impl TranscodeService {
    pub fn new(
        assets: Arc<dyn AssetStore>,
        transcoder: Arc<dyn TranscoderClient>,
        policy: Arc<EncodePolicy>,
        output: OutputConvention,
        notification_topic: String,
    ) -> Self {
        let builder = JobBuilder::new(policy, output.clone(), notification_topic);
        let submitter = JobSubmitter::new(assets.clone(), transcoder.clone());

        Self {
            ingest: IngestHandler::new(assets.clone(), builder, submitter),
            callbacks: CallbackHandler::new(assets.clone(), output.clone()),
            reconciler: Reconciler::new(assets, transcoder, output),
        }
    }
}
