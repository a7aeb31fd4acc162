use std::collections::HashMap;

use anyhow::{anyhow, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use utoipa::ToSchema;

/// Body posted by a Pub/Sub push subscription.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PushEnvelope {
    pub message: PushMessage,
    #[serde(default)]
    pub subscription: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PushMessage {
    /// Base64-encoded payload.
    #[serde(default)]
    pub data: Option<String>,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
    #[serde(default, alias = "message_id")]
    pub message_id: Option<String>,
}

impl PushMessage {
    pub fn decode_data(&self) -> Result<Vec<u8>> {
        let data = self
            .data
            .as_deref()
            .ok_or_else(|| anyhow!("push message has no data"))?;

        STANDARD
            .decode(data.trim())
            .map_err(|e| anyhow!("push message data is not base64: {}", e))
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}
