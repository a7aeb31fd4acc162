use serde::Deserialize;
use crate::config::env::{self, EnvKey};

pub const DEFAULT_TRANSCODER_API: &str = "https://transcoder.googleapis.com";
pub const DEFAULT_STORAGE_ENDPOINT: &str = "https://storage.googleapis.com";

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    pub server_port: u16,
    pub database_url: String,
    pub fallback_database_url: Option<String>,
    pub primary_namespace: String,
    pub secondary_namespace: String,
    pub redis_url: String,
    pub rabbitmq_url: Option<String>,
    pub upload_queue: String,
    pub transcoder_queue: String,
    pub jwt_secret: String,
    pub gcp_project_id: String,
    pub gcp_location: String,
    pub transcoder_api_url: String,
    pub transcoder_topic: String,
    pub media_bucket: String,
    pub storage_endpoint: String,
    pub storage_access_key: String,
    pub storage_secret_key: String,
    pub encode_policy_path: Option<String>,
}

impl AppConfig {
    pub fn new() -> Result<Self, std::env::VarError> {
        let gcp_project_id = env::get(EnvKey::GcpProjectId)?;
        let transcoder_topic = env::get_or(
            EnvKey::TranscoderTopic,
            &format!("projects/{}/topics/transcoder-updates", gcp_project_id),
        );

        Ok(Self {
            server_port: env::get_parsed(EnvKey::ServerPort, 3000),
            database_url: env::get(EnvKey::DatabaseUrl)?,
            fallback_database_url: env::get_opt(EnvKey::FallbackDatabaseUrl),
            primary_namespace: env::get_or(EnvKey::PrimaryNamespace, "primary"),
            secondary_namespace: env::get_or(EnvKey::SecondaryNamespace, "default"),
            redis_url: env::get(EnvKey::RedisUrl)?,
            rabbitmq_url: env::get_opt(EnvKey::RabbitMqUrl),
            upload_queue: env::get_or(EnvKey::UploadQueue, "upload_events"),
            transcoder_queue: env::get_or(EnvKey::TranscoderQueue, "transcoder_updates"),
            jwt_secret: env::get(EnvKey::JwtSecret)?,
            gcp_location: env::get_or(EnvKey::GcpLocation, "us-central1"),
            transcoder_api_url: env::get_or(EnvKey::TranscoderApiUrl, DEFAULT_TRANSCODER_API),
            transcoder_topic,
            gcp_project_id,
            media_bucket: env::get(EnvKey::MediaBucket)?,
            storage_endpoint: env::get_or(EnvKey::StorageEndpoint, DEFAULT_STORAGE_ENDPOINT),
            storage_access_key: env::get(EnvKey::StorageAccessKey)?,
            storage_secret_key: env::get(EnvKey::StorageSecretKey)?,
            encode_policy_path: env::get_opt(EnvKey::EncodePolicyPath),
        })
    }
}
