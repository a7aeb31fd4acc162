use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use media_pipeline::app;
use media_pipeline::config::settings::AppConfig;
use media_pipeline::infrastructure::db::pool::{connect_lazy, connect_to_db};
use media_pipeline::infrastructure::queue::rabbitmq::RabbitMqService;
use media_pipeline::infrastructure::redis::client::RedisService;
use media_pipeline::infrastructure::storage::s3::StorageService;
use media_pipeline::infrastructure::transcoder::auth::AccessTokenProvider;
use media_pipeline::infrastructure::transcoder::client::{GcpTranscoderClient, TranscoderConfig};
use media_pipeline::modules::asset::repository::{AssetStore, PgAssetStore};
use media_pipeline::modules::diagnostics::service::{DiagnosticService, Namespace};
use media_pipeline::modules::transcode::job_builder::EncodePolicy;
use media_pipeline::modules::transcode::output::OutputConvention;
use media_pipeline::modules::transcode::service::TranscodeService;
use media_pipeline::state::AppState;
use media_pipeline::workers;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("media_pipeline=info,tower_http=info")),
        )
        .init();

    info!("Starting server...");

    let config = AppConfig::new().context("Failed to load configuration")?;

    let policy = EncodePolicy::load(config.encode_policy_path.as_deref())
        .context("Failed to load encode policy")?;
    info!("Encode policy: {} video renditions", policy.video.len());

    let db = connect_to_db(&config.database_url)
        .await
        .context("Failed to connect to PostgreSQL")?;
    let assets: Arc<dyn AssetStore> = Arc::new(PgAssetStore::new(db));

    let secondary = match &config.fallback_database_url {
        Some(url) => {
            let pool = connect_lazy(url).context("Invalid FALLBACK_DATABASE_URL")?;
            let store: Arc<dyn AssetStore> = Arc::new(PgAssetStore::new(pool));
            Some(Namespace::new(config.secondary_namespace.clone(), store))
        }
        None => None,
    };
    let diagnostics = DiagnosticService::new(
        Namespace::new(config.primary_namespace.clone(), assets.clone()),
        secondary,
    );

    let tokens = AccessTokenProvider::application_default();
    let transcoder = GcpTranscoderClient::new(
        TranscoderConfig {
            api_url: config.transcoder_api_url.clone(),
            project_id: config.gcp_project_id.clone(),
            location: config.gcp_location.clone(),
        },
        tokens,
    )
    .context("Failed to build transcoder client")?;

    let transcode = TranscodeService::new(
        assets,
        Arc::new(transcoder),
        Arc::new(policy),
        OutputConvention::new(config.media_bucket.clone()),
        config.transcoder_topic.clone(),
    );

    let redis = RedisService::new(&config.redis_url)
        .await
        .context("Failed to connect to Redis")?;

    let storage = StorageService::new(
        &config.storage_endpoint,
        &config.media_bucket,
        &config.storage_access_key,
        &config.storage_secret_key,
    );

    match &config.rabbitmq_url {
        Some(url) => {
            let queue = RabbitMqService::new(url).await?;
            tokio::spawn(workers::events::start_upload_worker(
                queue.clone(),
                config.upload_queue.clone(),
                transcode.clone(),
            ));
            tokio::spawn(workers::events::start_transcoder_update_worker(
                queue,
                config.transcoder_queue.clone(),
                transcode.clone(),
            ));
        }
        None => warn!("RABBITMQ_URL not set, queue workers disabled; push endpoints only"),
    }

    let port = config.server_port;
    let state = AppState::new(config, redis, storage, transcode, diagnostics);
    let app = app::create_app(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
