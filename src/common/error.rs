use thiserror::Error;

use crate::infrastructure::transcoder::TranscoderError;
use crate::modules::asset::repository::StoreError;

/// Errors surfaced to callers of the reconcile and diagnostic operations.
///
/// Event handlers never return these; they log and drop instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Transcoder(#[from] TranscoderError),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
