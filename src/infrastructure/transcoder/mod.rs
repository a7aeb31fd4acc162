use async_trait::async_trait;
use thiserror::Error;

pub mod auth;
pub mod client;
pub mod model;

use model::{JobSnapshot, JobSpec};

#[derive(Debug, Error)]
pub enum TranscoderError {
    #[error("transcoder request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("transcoder API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("unexpected transcoder response: {0}")]
    Decode(String),

    #[error("could not obtain access token: {0}")]
    Auth(String),
}

/// The external transcoding service. One instance is built at startup and
/// shared by every component.
#[async_trait]
pub trait TranscoderClient: Send + Sync {
    /// Creates a job and returns its resource name, which is the durable
    /// correlation key for the asset.
    async fn create_job(&self, spec: &JobSpec) -> Result<String, TranscoderError>;

    async fn get_job(&self, name: &str) -> Result<JobSnapshot, TranscoderError>;
}
