//! Wire types for the Transcoder API `jobs` resource.
//!
//! Only the fields this service writes or reads are modelled; the API
//! accepts and returns many more.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSpec {
    pub input_uri: String,
    pub output_uri: String,
    pub labels: BTreeMap<String, String>,
    pub config: JobConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobConfig {
    pub pubsub_destination: PubsubDestination,
    pub elementary_streams: Vec<ElementaryStream>,
    pub mux_streams: Vec<MuxStream>,
    pub manifests: Vec<Manifest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PubsubDestination {
    pub topic: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementaryStream {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_stream: Option<VideoStream>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_stream: Option<AudioStream>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoStream {
    pub h264: H264Settings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct H264Settings {
    pub height_pixels: u32,
    pub width_pixels: u32,
    pub bitrate_bps: u32,
    pub frame_rate: f64,
    pub profile: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioStream {
    pub codec: String,
    pub bitrate_bps: u32,
    pub channel_count: u32,
    pub sample_rate_hertz: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MuxStream {
    pub key: String,
    pub container: String,
    pub elementary_streams: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub file_name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub mux_streams: Vec<String>,
}

/// Lifecycle state reported by the Transcoder API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobState {
    Pending,
    Running,
    Succeeded,
    Failed,
    Other(String),
}

impl JobState {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "PENDING" => JobState::Pending,
            "RUNNING" => JobState::Running,
            "SUCCEEDED" => JobState::Succeeded,
            "FAILED" => JobState::Failed,
            other => JobState::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            JobState::Pending => "PENDING",
            JobState::Running => "RUNNING",
            JobState::Succeeded => "SUCCEEDED",
            JobState::Failed => "FAILED",
            JobState::Other(raw) => raw,
        }
    }
}

/// Current view of a job as returned by `jobs.get`.
#[derive(Debug, Clone, PartialEq)]
pub struct JobSnapshot {
    pub name: String,
    pub state: JobState,
    pub error: Option<String>,
}

/// Renders a `google.rpc.Status` (or anything else found under `error`)
/// into a single diagnostic line.
pub fn error_detail(error: &serde_json::Value) -> String {
    match error.get("message").and_then(|m| m.as_str()) {
        Some(message) if !message.is_empty() => message.to_string(),
        _ => error.to_string(),
    }
}
