use std::env;
use std::str::FromStr;

pub enum EnvKey {
    ServerPort,
    DatabaseUrl,
    FallbackDatabaseUrl,
    PrimaryNamespace,
    SecondaryNamespace,
    RedisUrl,
    RabbitMqUrl,
    UploadQueue,
    TranscoderQueue,
    JwtSecret,
    GcpProjectId,
    GcpLocation,
    TranscoderApiUrl,
    TranscoderTopic,
    MediaBucket,
    StorageEndpoint,
    StorageAccessKey,
    StorageSecretKey,
    EncodePolicyPath,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerPort => "APP_PORT",
            EnvKey::DatabaseUrl => "DATABASE_URL",
            EnvKey::FallbackDatabaseUrl => "FALLBACK_DATABASE_URL",
            EnvKey::PrimaryNamespace => "PRIMARY_NAMESPACE",
            EnvKey::SecondaryNamespace => "SECONDARY_NAMESPACE",
            EnvKey::RedisUrl => "REDIS_URL",
            EnvKey::RabbitMqUrl => "RABBITMQ_URL",
            EnvKey::UploadQueue => "UPLOAD_EVENTS_QUEUE",
            EnvKey::TranscoderQueue => "TRANSCODER_UPDATES_QUEUE",
            EnvKey::JwtSecret => "JWT_SECRET",
            EnvKey::GcpProjectId => "GCP_PROJECT_ID",
            EnvKey::GcpLocation => "GCP_TRANSCODER_LOCATION",
            EnvKey::TranscoderApiUrl => "TRANSCODER_API_URL",
            EnvKey::TranscoderTopic => "TRANSCODER_TOPIC",
            EnvKey::MediaBucket => "GCS_BUCKET",
            EnvKey::StorageEndpoint => "STORAGE_ENDPOINT",
            EnvKey::StorageAccessKey => "STORAGE_ACCESS_KEY",
            EnvKey::StorageSecretKey => "STORAGE_SECRET_KEY",
            EnvKey::EncodePolicyPath => "ENCODE_POLICY_PATH",
        }
    }
}

pub fn get(key: EnvKey) -> Result<String, env::VarError> {
    env::var(key.as_str())
}

pub fn get_opt(key: EnvKey) -> Option<String> {
    env::var(key.as_str()).ok().filter(|v| !v.trim().is_empty())
}

pub fn get_or(key: EnvKey, default: &str) -> String {
    env::var(key.as_str()).unwrap_or_else(|_| default.to_string())
}

pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> T {
    match get(key) {
        Ok(val) => val.parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}
