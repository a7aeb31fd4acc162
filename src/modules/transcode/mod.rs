use axum::Router;
use axum::routing::{get, post};
use crate::state::AppState;

pub mod callback;
pub mod dto;
pub mod events;
pub mod handler;
pub mod ingest;
pub mod job_builder;
pub mod output;
pub mod reconciler;
pub mod service;
pub mod submitter;
pub mod transition;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events/uploads", post(handler::receive_upload))
        .route("/events/transcoder", post(handler::receive_transcoder_update))
        .route("/assets/{id}/transcode-status", get(handler::check_transcode_status))
}
