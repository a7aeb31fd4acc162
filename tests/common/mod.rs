//! Shared fakes for integration tests.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};

use media_pipeline::config::settings::AppConfig;
use media_pipeline::infrastructure::redis::client::RedisService;
use media_pipeline::infrastructure::storage::s3::StorageService;
use media_pipeline::infrastructure::transcoder::model::{JobSnapshot, JobSpec, JobState};
use media_pipeline::infrastructure::transcoder::{TranscoderClient, TranscoderError};
use media_pipeline::modules::asset::model::{AssetStatus, MediaAsset};
use media_pipeline::modules::asset::repository::{AssetStore, StoreError, ASSET_COLLECTION};
use media_pipeline::modules::diagnostics::service::{DiagnosticService, Namespace};
use media_pipeline::modules::transcode::events::UploadEvent;
use media_pipeline::modules::transcode::job_builder::EncodePolicy;
use media_pipeline::modules::transcode::output::OutputConvention;
use media_pipeline::modules::transcode::service::TranscodeService;
use media_pipeline::state::AppState;

pub const BUCKET: &str = "media-bucket";
pub const TOPIC: &str = "projects/p/topics/transcoder-updates";

/// `AssetStore` over a map, with the same conditional-write rules as the
/// Postgres store.
#[derive(Default)]
pub struct MemoryAssetStore {
    records: Mutex<HashMap<String, MediaAsset>>,
    claims: Mutex<HashSet<String>>,
    tables: Mutex<Vec<String>>,
    failing: AtomicBool,
    failing_record_job: AtomicBool,
    failing_mark_processing: AtomicBool,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        let store = Self::default();
        store.set_tables(&[ASSET_COLLECTION]);
        store
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn insert(&self, asset: MediaAsset) {
        self.records.lock().unwrap().insert(asset.id.clone(), asset);
    }

    pub fn with_asset(&self, id: &str) {
        self.insert(blank_asset(id));
    }

    pub fn record(&self, id: &str) -> Option<MediaAsset> {
        self.records.lock().unwrap().get(id).cloned()
    }

    pub fn set_tables(&self, tables: &[&str]) {
        *self.tables.lock().unwrap() = tables.iter().map(|t| t.to_string()).collect();
    }

    /// Every call fails while set.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_failing_record_job(&self, failing: bool) {
        self.failing_record_job.store(failing, Ordering::SeqCst);
    }

    /// Only the Processing write fails while set.
    pub fn set_failing_mark_processing(&self, failing: bool) {
        self.failing_mark_processing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("store offline".into()));
        }
        Ok(())
    }

    fn update<F>(&self, id: &str, apply: F) -> bool
    where
        F: FnOnce(&mut MediaAsset) -> bool,
    {
        let mut records = self.records.lock().unwrap();
        match records.get_mut(id) {
            Some(asset) => apply(asset),
            None => false,
        }
    }
}

pub fn blank_asset(id: &str) -> MediaAsset {
    MediaAsset {
        id: id.to_string(),
        status: None,
        source_uri: None,
        job_correlation_id: None,
        video_url: None,
        job_error: None,
        last_updated: None,
    }
}

#[async_trait]
impl AssetStore for MemoryAssetStore {
    async fn get(&self, id: &str) -> Result<Option<MediaAsset>, StoreError> {
        self.check()?;
        Ok(self.record(id))
    }

    async fn find_by_job(&self, job_name: &str) -> Result<Vec<MediaAsset>, StoreError> {
        self.check()?;
        let records = self.records.lock().unwrap();
        Ok(records
            .values()
            .filter(|a| a.job_correlation_id.as_deref() == Some(job_name))
            .cloned()
            .collect())
    }

    async fn mark_processing(&self, id: &str) -> Result<bool, StoreError> {
        self.check()?;
        if self.failing_mark_processing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("write rejected".into()));
        }
        Ok(self.update(id, |asset| {
            if asset.is_terminal() {
                return false;
            }
            asset.status = Some(AssetStatus::Processing);
            true
        }))
    }

    async fn claim_submission(&self, id: &str) -> Result<bool, StoreError> {
        self.check()?;
        let records = self.records.lock().unwrap();
        let mut claims = self.claims.lock().unwrap();
        match records.get(id) {
            Some(asset) if asset.job_correlation_id.is_none() && !asset.is_terminal() => {
                Ok(claims.insert(id.to_string()))
            }
            _ => Ok(false),
        }
    }

    async fn record_job(&self, id: &str, job_name: &str) -> Result<bool, StoreError> {
        self.check()?;
        if self.failing_record_job.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("write rejected".into()));
        }
        Ok(self.update(id, |asset| {
            if asset.job_correlation_id.is_some() {
                return false;
            }
            asset.job_correlation_id = Some(job_name.to_string());
            true
        }))
    }

    async fn mark_ready(&self, id: &str, video_url: &str) -> Result<bool, StoreError> {
        self.check()?;
        Ok(self.update(id, |asset| {
            if asset.is_terminal() {
                return false;
            }
            asset.status = Some(AssetStatus::Ready);
            asset.video_url = Some(video_url.to_string());
            asset.job_error = None;
            true
        }))
    }

    async fn mark_failed(&self, id: &str, detail: Option<&str>) -> Result<bool, StoreError> {
        self.check()?;
        Ok(self.update(id, |asset| {
            if asset.status == Some(AssetStatus::Ready) {
                return false;
            }
            asset.status = Some(AssetStatus::Error);
            asset.video_url = None;
            asset.job_error = detail.map(str::to_string);
            true
        }))
    }

    async fn force_ready(&self, id: &str, video_url: &str) -> Result<bool, StoreError> {
        self.check()?;
        Ok(self.update(id, |asset| {
            asset.status = Some(AssetStatus::Ready);
            asset.video_url = Some(video_url.to_string());
            asset.job_error = None;
            asset.last_updated = Some(time::OffsetDateTime::now_utc());
            true
        }))
    }

    async fn list_collections(&self) -> Result<Vec<String>, StoreError> {
        self.check()?;
        Ok(self.tables.lock().unwrap().clone())
    }
}

/// Transcoder double: hands out job names in order and serves job states
/// from a map.
#[derive(Default)]
pub struct FakeTranscoder {
    names: Mutex<VecDeque<String>>,
    reject: Mutex<Option<String>>,
    jobs: Mutex<HashMap<String, JobSnapshot>>,
    submitted: Mutex<Vec<JobSpec>>,
    create_delay: Mutex<Option<Duration>>,
}

impl FakeTranscoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn queue_name(&self, name: &str) {
        self.names.lock().unwrap().push_back(name.to_string());
    }

    pub fn reject_with(&self, body: &str) {
        *self.reject.lock().unwrap() = Some(body.to_string());
    }

    pub fn set_job(&self, name: &str, state: JobState, error: Option<&str>) {
        self.jobs.lock().unwrap().insert(
            name.to_string(),
            JobSnapshot {
                name: name.to_string(),
                state,
                error: error.map(str::to_string),
            },
        );
    }

    /// Holds `create_job` open for `delay`, like a slow API call.
    pub fn delay_creates(&self, delay: Duration) {
        *self.create_delay.lock().unwrap() = Some(delay);
    }

    pub fn submissions(&self) -> Vec<JobSpec> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranscoderClient for FakeTranscoder {
    async fn create_job(&self, spec: &JobSpec) -> Result<String, TranscoderError> {
        self.submitted.lock().unwrap().push(spec.clone());

        let delay = *self.create_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(body) = self.reject.lock().unwrap().clone() {
            return Err(TranscoderError::Api { status: 400, body });
        }

        self.names
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| TranscoderError::Decode("no job name queued".into()))
    }

    async fn get_job(&self, name: &str) -> Result<JobSnapshot, TranscoderError> {
        self.jobs
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .ok_or_else(|| TranscoderError::Api {
                status: 404,
                body: format!("job {} not found", name),
            })
    }
}

pub fn output() -> OutputConvention {
    OutputConvention::new(BUCKET)
}

pub fn transcode_service(store: Arc<MemoryAssetStore>, transcoder: Arc<FakeTranscoder>) -> TranscodeService {
    TranscodeService::new(
        store,
        transcoder,
        Arc::new(EncodePolicy::default()),
        output(),
        TOPIC.to_string(),
    )
}

pub fn video_upload(asset_id: &str) -> UploadEvent {
    UploadEvent {
        bucket: BUCKET.to_string(),
        path: format!("videos/{}/source.mp4", asset_id),
        content_type: Some("video/mp4".to_string()),
    }
}

/// Job notification as published by the transcoder.
pub fn notification(job_name: &str, state: &str) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "job": { "name": job_name, "state": state }
    }))
    .unwrap()
}

/// Wraps a payload in a Pub/Sub push envelope.
pub fn push_envelope(payload: &[u8], attributes: serde_json::Value) -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "message": {
            "data": STANDARD.encode(payload),
            "attributes": attributes,
            "messageId": "1"
        },
        "subscription": "projects/p/subscriptions/s"
    }))
    .unwrap()
}

pub fn test_config() -> AppConfig {
    AppConfig {
        server_port: 0,
        database_url: "postgres://localhost/media".into(),
        fallback_database_url: None,
        primary_namespace: "primary".into(),
        secondary_namespace: "default".into(),
        // Nothing listens here; requests that reach Redis fail fast.
        redis_url: "redis://127.0.0.1:1/".into(),
        rabbitmq_url: None,
        upload_queue: "upload_events".into(),
        transcoder_queue: "transcoder_updates".into(),
        jwt_secret: "test-secret".into(),
        gcp_project_id: "p".into(),
        gcp_location: "us-central1".into(),
        transcoder_api_url: "http://127.0.0.1:1".into(),
        transcoder_topic: TOPIC.into(),
        media_bucket: BUCKET.into(),
        storage_endpoint: "http://127.0.0.1:1".into(),
        storage_access_key: "key".into(),
        storage_secret_key: "secret".into(),
        encode_policy_path: None,
    }
}

pub fn app_state(store: Arc<MemoryAssetStore>, transcoder: Arc<FakeTranscoder>) -> AppState {
    let config = test_config();
    let redis = RedisService::open(&config.redis_url).unwrap();
    let storage = StorageService::new(
        &config.storage_endpoint,
        &config.media_bucket,
        &config.storage_access_key,
        &config.storage_secret_key,
    );
    let diagnostics = DiagnosticService::new(Namespace::new("primary", store.clone()), None);
    let transcode = transcode_service(store, transcoder);

    AppState::new(config, redis, storage, transcode, diagnostics)
}
