use std::sync::Arc;

use tracing::{info, warn};

use crate::common::error::{PipelineError, PipelineResult};
use crate::modules::asset::repository::{AssetStore, ASSET_COLLECTION};

/// One candidate data-store namespace.
#[derive(Clone)]
pub struct Namespace {
    pub name: String,
    pub store: Arc<dyn AssetStore>,
}

impl Namespace {
    pub fn new(name: impl Into<String>, store: Arc<dyn AssetStore>) -> Self {
        Self {
            name: name.into(),
            store,
        }
    }
}

/// Operator override: force an asset to Ready with an explicit URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForceUpdate {
    pub asset_id: String,
    pub url: String,
}

impl ForceUpdate {
    /// Both values are needed for an override; with either missing the
    /// request is a probe only.
    pub fn from_parts(asset_id: Option<String>, url: Option<String>) -> PipelineResult<Option<Self>> {
        let (Some(asset_id), Some(url)) = (
            asset_id.filter(|s| !s.trim().is_empty()),
            url.filter(|s| !s.trim().is_empty()),
        ) else {
            return Ok(None);
        };

        let parsed = url::Url::parse(&url)
            .map_err(|e| PipelineError::InvalidInput(format!("Invalid URL {}: {}", url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(PipelineError::InvalidInput(format!(
                "URL must be http or https, got {}",
                parsed.scheme()
            )));
        }

        Ok(Some(Self { asset_id, url }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticOutcome {
    /// No candidate namespace is reachable and holds the asset table.
    Failure,
    ProbeOnly { active: String },
    Updated { active: String, asset_id: String, url: String },
    AssetNotFound { active: String, asset_id: String },
    UpdateFailed { active: String, error: String },
}

#[derive(Debug, Clone)]
pub struct DiagnosticReport {
    pub outcome: DiagnosticOutcome,
    pub log: Vec<String>,
}

impl DiagnosticReport {
    pub fn render(&self) -> String {
        let logs = self.log.join("\n");
        match &self.outcome {
            DiagnosticOutcome::Failure => format!("DIAGNOSTIC FAILURE.\n\nLogs:\n{}", logs),
            DiagnosticOutcome::ProbeOnly { active } => format!(
                "DIAGNOSTIC SUCCESS. Active namespace appears to be: {}\n\nLogs:\n{}",
                active, logs
            ),
            DiagnosticOutcome::Updated { active, asset_id, url } => {
                format!("SUCCESS: Updated {} in {} to {}", asset_id, active, url)
            }
            DiagnosticOutcome::AssetNotFound { active, asset_id } => {
                format!("Asset {} NOT FOUND in {}.\n\nLogs:\n{}", asset_id, active, logs)
            }
            DiagnosticOutcome::UpdateFailed { active, error } => {
                format!("UPDATE FAILED in {}: {}\n\nLogs:\n{}", active, error, logs)
            }
        }
    }
}

#[derive(Default)]
struct ProbeLog(Vec<String>);

impl ProbeLog {
    fn push(&mut self, line: String) {
        info!("{}", line);
        self.0.push(line);
    }
}

/// Finds the namespace that actually holds the media records and applies
/// operator overrides there.
#[derive(Clone)]
pub struct DiagnosticService {
    primary: Namespace,
    secondary: Option<Namespace>,
}

impl DiagnosticService {
    pub fn new(primary: Namespace, secondary: Option<Namespace>) -> Self {
        Self { primary, secondary }
    }

    async fn probe(namespace: &Namespace, log: &mut ProbeLog) -> bool {
        log.push(format!("[DIAGNOSTIC] Checking accessibility of namespace '{}'...", namespace.name));

        match namespace.store.list_collections().await {
            Ok(collections) => {
                log.push(format!(
                    "[DIAGNOSTIC] Namespace '{}' connected. Collections: [{}]",
                    namespace.name,
                    collections.join(", ")
                ));
                let valid = collections.iter().any(|c| c == ASSET_COLLECTION);
                if !valid {
                    log.push(format!(
                        "[DIAGNOSTIC] Namespace '{}' has no '{}' collection",
                        namespace.name, ASSET_COLLECTION
                    ));
                }
                valid
            }
            Err(e) => {
                log.push(format!(
                    "[DIAGNOSTIC] Namespace '{}' connection FAILED: {}",
                    namespace.name, e
                ));
                false
            }
        }
    }

    /// Probes every candidate, then prefers the primary over the secondary.
    async fn resolve(&self, log: &mut ProbeLog) -> Option<&Namespace> {
        let primary_ok = Self::probe(&self.primary, log).await;

        let secondary_ok = match &self.secondary {
            Some(secondary) => Self::probe(secondary, log).await,
            None => {
                log.push("[DIAGNOSTIC] No secondary namespace configured".to_string());
                false
            }
        };

        if primary_ok {
            Some(&self.primary)
        } else if secondary_ok {
            self.secondary.as_ref()
        } else {
            None
        }
    }

    pub async fn run(&self, update: Option<ForceUpdate>) -> DiagnosticReport {
        let mut log = ProbeLog::default();

        let Some(active) = self.resolve(&mut log).await else {
            warn!("Diagnostics found no usable namespace");
            return DiagnosticReport {
                outcome: DiagnosticOutcome::Failure,
                log: log.0,
            };
        };
        let active_name = active.name.clone();

        let Some(update) = update else {
            return DiagnosticReport {
                outcome: DiagnosticOutcome::ProbeOnly { active: active_name },
                log: log.0,
            };
        };

        log.push(format!("[ACTION] Updating {} in {}...", update.asset_id, active_name));

        let outcome = match active.store.force_ready(&update.asset_id, &update.url).await {
            Ok(true) => {
                info!("Forced asset {} to Ready in {}", update.asset_id, active_name);
                DiagnosticOutcome::Updated {
                    active: active_name,
                    asset_id: update.asset_id,
                    url: update.url,
                }
            }
            Ok(false) => DiagnosticOutcome::AssetNotFound {
                active: active_name,
                asset_id: update.asset_id,
            },
            Err(e) => DiagnosticOutcome::UpdateFailed {
                active: active_name,
                error: e.to_string(),
            },
        };

        DiagnosticReport {
            outcome,
            log: log.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_needs_both_values() {
        assert_eq!(ForceUpdate::from_parts(None, Some("https://x/y.m3u8".into())).unwrap(), None);
        assert_eq!(ForceUpdate::from_parts(Some("a".into()), None).unwrap(), None);
        assert_eq!(ForceUpdate::from_parts(Some(" ".into()), Some("https://x".into())).unwrap(), None);
    }

    #[test]
    fn override_url_must_be_http() {
        assert!(matches!(
            ForceUpdate::from_parts(Some("a".into()), Some("gs://b/processed/a/manifest.m3u8".into())),
            Err(PipelineError::InvalidInput(_))
        ));
        assert!(matches!(
            ForceUpdate::from_parts(Some("a".into()), Some("not a url".into())),
            Err(PipelineError::InvalidInput(_))
        ));

        let ok = ForceUpdate::from_parts(Some("a".into()), Some("https://cdn.example/a.m3u8".into()))
            .unwrap()
            .unwrap();
        assert_eq!(ok.asset_id, "a");
    }

    #[test]
    fn failure_report_carries_the_log() {
        let report = DiagnosticReport {
            outcome: DiagnosticOutcome::Failure,
            log: vec!["first".into(), "second".into()],
        };
        assert_eq!(report.render(), "DIAGNOSTIC FAILURE.\n\nLogs:\nfirst\nsecond");
    }
}
