use utoipa::OpenApi;
use crate::common::pubsub::{PushEnvelope, PushMessage};
use crate::modules::diagnostics::dto::FileListResponse;
use crate::modules::transcode::dto::{AssetRecordSnapshot, TranscodeStatusResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::transcode::handler::receive_upload,
        crate::modules::transcode::handler::receive_transcoder_update,
        crate::modules::transcode::handler::check_transcode_status,
        crate::modules::diagnostics::handler::force_update,
        crate::modules::diagnostics::handler::list_files,
    ),
    components(
        schemas(
            PushEnvelope, PushMessage,
            TranscodeStatusResponse, AssetRecordSnapshot,
            FileListResponse,
        )
    ),
    tags(
        (name = "Pipeline", description = "Upload ingest, transcoder callbacks and status reconciliation"),
        (name = "Diagnostics", description = "Operator recovery tools")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

use utoipa::Modify;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
