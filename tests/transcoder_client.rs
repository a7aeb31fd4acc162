use media_pipeline::infrastructure::transcoder::auth::AccessTokenProvider;
use media_pipeline::infrastructure::transcoder::client::{GcpTranscoderClient, TranscoderConfig};
use media_pipeline::infrastructure::transcoder::model::JobState;
use media_pipeline::infrastructure::transcoder::{TranscoderClient, TranscoderError};
use media_pipeline::modules::transcode::job_builder::{EncodePolicy, JobBuilder};
use media_pipeline::modules::transcode::output::OutputConvention;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PARENT_JOBS: &str = "/v1/projects/p/locations/us-central1/jobs";
const JOB_NAME: &str = "projects/p/locations/us-central1/jobs/job-1";

fn client(server: &MockServer) -> GcpTranscoderClient {
    GcpTranscoderClient::new(
        TranscoderConfig {
            api_url: server.uri(),
            project_id: "p".into(),
            location: "us-central1".into(),
        },
        AccessTokenProvider::fixed("test-token"),
    )
    .unwrap()
}

fn spec() -> media_pipeline::infrastructure::transcoder::model::JobSpec {
    JobBuilder::new(
        Arc::new(EncodePolicy::default()),
        OutputConvention::new("media-bucket"),
        "projects/p/topics/t".into(),
    )
    .build("abc123", "gs://media-bucket/videos/abc123/source.mp4")
}

#[tokio::test]
async fn create_job_posts_spec_and_returns_name() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(PARENT_JOBS))
        .and(header("authorization", "Bearer test-token"))
        .and(body_partial_json(json!({
            "inputUri": "gs://media-bucket/videos/abc123/source.mp4",
            "outputUri": "gs://media-bucket/processed/abc123/",
            "config": { "pubsubDestination": { "topic": "projects/p/topics/t" } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": JOB_NAME,
            "state": "PENDING"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let name = client(&server).create_job(&spec()).await.unwrap();
    assert_eq!(name, JOB_NAME);
}

#[tokio::test]
async fn create_job_surfaces_api_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(PARENT_JOBS))
        .respond_with(ResponseTemplate::new(403).set_body_string("permission denied"))
        .mount(&server)
        .await;

    match client(&server).create_job(&spec()).await {
        Err(TranscoderError::Api { status, body }) => {
            assert_eq!(status, 403);
            assert_eq!(body, "permission denied");
        }
        other => panic!("unexpected result {:?}", other),
    }
}

#[tokio::test]
async fn create_job_rejects_empty_name() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(PARENT_JOBS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "" })))
        .mount(&server)
        .await;

    assert!(matches!(
        client(&server).create_job(&spec()).await,
        Err(TranscoderError::Decode(_))
    ));
}

#[tokio::test]
async fn get_job_reads_state_and_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/v1/{}", JOB_NAME)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": JOB_NAME,
            "state": "FAILED",
            "error": { "code": 3, "message": "input has no video stream" }
        })))
        .mount(&server)
        .await;

    let job = client(&server).get_job(JOB_NAME).await.unwrap();
    assert_eq!(job.name, JOB_NAME);
    assert_eq!(job.state, JobState::Failed);
    assert_eq!(job.error.as_deref(), Some("input has no video stream"));
}

#[tokio::test]
async fn get_job_without_state_is_not_terminal() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("/v1/{}", JOB_NAME)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": JOB_NAME })))
        .mount(&server)
        .await;

    let job = client(&server).get_job(JOB_NAME).await.unwrap();
    assert!(matches!(job.state, JobState::Other(_)));
}
