use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};

use super::output::{OutputConvention, MANIFEST_FILE};
use crate::infrastructure::transcoder::model::{
    AudioStream, ElementaryStream, H264Settings, JobConfig, JobSpec, Manifest, MuxStream,
    PubsubDestination, VideoStream,
};

/// Label carrying the asset id on the job. The service lowercases label
/// values, so it is informational only and never used for correlation.
pub const ASSET_LABEL: &str = "movieid";

/// Rendition ladder and packaging applied to every upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodePolicy {
    pub video: Vec<VideoRendition>,
    pub audio: AudioRendition,
    /// Segment container of every muxed variant.
    pub container: String,
    /// Manifest format, e.g. `HLS`.
    pub manifest_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRendition {
    pub key: String,
    /// Key of the muxed variant pairing this rendition with the audio.
    pub mux_key: String,
    pub width: u32,
    pub height: u32,
    pub bitrate_bps: u32,
    pub frame_rate: f64,
    pub profile: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioRendition {
    pub key: String,
    pub codec: String,
    pub bitrate_bps: u32,
    pub channel_count: u32,
    pub sample_rate_hertz: u32,
}

impl Default for EncodePolicy {
    fn default() -> Self {
        let video = |key: &str, mux_key: &str, width, height, bitrate_bps| VideoRendition {
            key: key.to_string(),
            mux_key: mux_key.to_string(),
            width,
            height,
            bitrate_bps,
            frame_rate: 30.0,
            profile: "high".to_string(),
        };

        Self {
            video: vec![
                video("video-stream0", "sd", 640, 360, 550_000),
                video("video-stream1", "hd", 1280, 720, 2_500_000),
                video("video-stream2", "fhd", 1920, 1080, 5_000_000),
            ],
            audio: AudioRendition {
                key: "audio-stream0".to_string(),
                codec: "aac".to_string(),
                bitrate_bps: 64_000,
                channel_count: 2,
                sample_rate_hertz: 48_000,
            },
            container: "ts".to_string(),
            manifest_type: "HLS".to_string(),
        }
    }
}

impl EncodePolicy {
    /// Reads a JSON policy file; falls back to the built-in ladder when no
    /// path is configured.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = std::fs::read_to_string(Path::new(path))
            .with_context(|| format!("Failed to read encode policy {}", path))?;
        let policy: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid encode policy {}", path))?;

        policy.validate()?;
        Ok(policy)
    }

    pub fn validate(&self) -> Result<()> {
        if self.video.is_empty() {
            bail!("encode policy needs at least one video rendition");
        }

        let mut keys = HashSet::new();
        keys.insert(self.audio.key.as_str());
        let mut mux_keys = HashSet::new();

        for rendition in &self.video {
            if !keys.insert(rendition.key.as_str()) {
                return Err(anyhow!("duplicate elementary stream key {}", rendition.key));
            }
            if !mux_keys.insert(rendition.mux_key.as_str()) {
                return Err(anyhow!("duplicate mux stream key {}", rendition.mux_key));
            }
            if rendition.width == 0 || rendition.height == 0 || rendition.bitrate_bps == 0 {
                return Err(anyhow!("rendition {} has a zero dimension or bitrate", rendition.key));
            }
        }

        if self.audio.bitrate_bps == 0 || self.audio.sample_rate_hertz == 0 {
            bail!("audio rendition {} has a zero bitrate or sample rate", self.audio.key);
        }

        Ok(())
    }
}

/// Turns an asset id and its source location into a job specification.
/// Pure: the same inputs always produce the same spec.
#[derive(Clone, Debug)]
pub struct JobBuilder {
    policy: Arc<EncodePolicy>,
    output: OutputConvention,
    notification_topic: String,
}

impl JobBuilder {
    pub fn new(policy: Arc<EncodePolicy>, output: OutputConvention, notification_topic: String) -> Self {
        Self {
            policy,
            output,
            notification_topic,
        }
    }

    pub fn output(&self) -> &OutputConvention {
        &self.output
    }

    pub fn build(&self, asset_id: &str, source_uri: &str) -> JobSpec {
        let policy = &self.policy;

        let mut elementary_streams: Vec<ElementaryStream> = policy
            .video
            .iter()
            .map(|r| ElementaryStream {
                key: r.key.clone(),
                video_stream: Some(VideoStream {
                    h264: H264Settings {
                        height_pixels: r.height,
                        width_pixels: r.width,
                        bitrate_bps: r.bitrate_bps,
                        frame_rate: r.frame_rate,
                        profile: r.profile.clone(),
                    },
                }),
                audio_stream: None,
            })
            .collect();

        elementary_streams.push(ElementaryStream {
            key: policy.audio.key.clone(),
            video_stream: None,
            audio_stream: Some(AudioStream {
                codec: policy.audio.codec.clone(),
                bitrate_bps: policy.audio.bitrate_bps,
                channel_count: policy.audio.channel_count,
                sample_rate_hertz: policy.audio.sample_rate_hertz,
            }),
        });

        let mux_streams: Vec<MuxStream> = policy
            .video
            .iter()
            .map(|r| MuxStream {
                key: r.mux_key.clone(),
                container: policy.container.clone(),
                elementary_streams: vec![r.key.clone(), policy.audio.key.clone()],
            })
            .collect();

        let manifest = Manifest {
            file_name: MANIFEST_FILE.to_string(),
            kind: policy.manifest_type.clone(),
            mux_streams: mux_streams.iter().map(|m| m.key.clone()).collect(),
        };

        let mut labels = BTreeMap::new();
        labels.insert(ASSET_LABEL.to_string(), asset_id.to_lowercase());

        JobSpec {
            input_uri: source_uri.to_string(),
            output_uri: self.output.output_uri(asset_id),
            labels,
            config: JobConfig {
                pubsub_destination: PubsubDestination {
                    topic: self.notification_topic.clone(),
                },
                elementary_streams,
                mux_streams,
                manifests: vec![manifest],
            },
        }
    }
}
