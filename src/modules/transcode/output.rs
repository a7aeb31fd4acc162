//! Where transcoded output lands and how it is played back.
//!
//! The job builder writes to this location and both the callback handler
//! and the reconciler derive the playback URL from it, so the layout lives
//! here and nowhere else.

pub const OUTPUT_PREFIX: &str = "processed";
pub const MANIFEST_FILE: &str = "manifest.m3u8";
pub const PUBLIC_STORAGE_HOST: &str = "https://storage.googleapis.com";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputConvention {
    bucket: String,
}

impl OutputConvention {
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Object prefix of an asset's rendered output, with trailing slash.
    pub fn output_prefix(&self, asset_id: &str) -> String {
        format!("{}/{}/", OUTPUT_PREFIX, asset_id)
    }

    pub fn output_uri(&self, asset_id: &str) -> String {
        format!("gs://{}/{}", self.bucket, self.output_prefix(asset_id))
    }

    pub fn playback_url(&self, asset_id: &str) -> String {
        format!(
            "{}/{}/{}{}",
            PUBLIC_STORAGE_HOST,
            self.bucket,
            self.output_prefix(asset_id),
            MANIFEST_FILE
        )
    }
}
