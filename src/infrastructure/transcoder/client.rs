use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{error, info};

use super::auth::AccessTokenProvider;
use super::model::{error_detail, JobSnapshot, JobSpec, JobState};
use super::{TranscoderClient, TranscoderError};

#[derive(Clone, Debug)]
pub struct TranscoderConfig {
    /// Base URL of the API, e.g. `https://transcoder.googleapis.com`.
    pub api_url: String,
    pub project_id: String,
    pub location: String,
}

impl TranscoderConfig {
    pub fn parent(&self) -> String {
        format!("projects/{}/locations/{}", self.project_id, self.location)
    }
}

/// Transcoder API v1 over REST.
pub struct GcpTranscoderClient {
    config: TranscoderConfig,
    http: reqwest::Client,
    tokens: AccessTokenProvider,
}

impl GcpTranscoderClient {
    pub fn new(config: TranscoderConfig, tokens: AccessTokenProvider) -> Result<Self, TranscoderError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self::with_http(config, http, tokens))
    }

    pub fn with_http(
        config: TranscoderConfig,
        http: reqwest::Client,
        tokens: AccessTokenProvider,
    ) -> Self {
        Self { config, http, tokens }
    }

    fn endpoint(&self, resource: &str) -> String {
        format!(
            "{}/v1/{}",
            self.config.api_url.trim_end_matches('/'),
            resource.trim_start_matches('/')
        )
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, TranscoderError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        error!("Transcoder API error {}: {}", status, body);
        Err(TranscoderError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

#[derive(Deserialize)]
struct CreateJobResponse {
    name: String,
}

#[derive(Deserialize)]
struct GetJobResponse {
    name: String,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[async_trait]
impl TranscoderClient for GcpTranscoderClient {
    async fn create_job(&self, spec: &JobSpec) -> Result<String, TranscoderError> {
        let token = self.tokens.token().await?;
        let url = self.endpoint(&format!("{}/jobs", self.config.parent()));

        info!(
            "Creating transcoder job: input={}, output={}",
            spec.input_uri, spec.output_uri
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(spec)
            .send()
            .await?;

        let created: CreateJobResponse = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| TranscoderError::Decode(e.to_string()))?;

        if created.name.is_empty() {
            return Err(TranscoderError::Decode("job response has an empty name".into()));
        }

        Ok(created.name)
    }

    async fn get_job(&self, name: &str) -> Result<JobSnapshot, TranscoderError> {
        let token = self.tokens.token().await?;

        let response = self
            .http
            .get(self.endpoint(name))
            .bearer_auth(token)
            .send()
            .await?;

        let job: GetJobResponse = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| TranscoderError::Decode(e.to_string()))?;

        Ok(JobSnapshot {
            name: job.name,
            state: JobState::parse(job.state.as_deref().unwrap_or("PROCESSING_STATE_UNSPECIFIED")),
            error: job.error.as_ref().map(error_detail),
        })
    }
}
