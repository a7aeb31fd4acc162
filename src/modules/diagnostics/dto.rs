use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ForceUpdateQuery {
    #[validate(length(max = 256, message = "Asset id is too long"))]
    pub asset_id: Option<String>,
    #[validate(length(max = 2048, message = "Playback URL is too long"))]
    pub hls_url: Option<String>,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListFilesQuery {
    #[validate(length(max = 1024, message = "Prefix is too long"))]
    pub prefix: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FileListResponse {
    pub prefix: String,
    pub files: Vec<String>,
}
