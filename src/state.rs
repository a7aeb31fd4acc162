use crate::config::settings::AppConfig;
use crate::infrastructure::redis::client::RedisService;
use crate::infrastructure::storage::s3::StorageService;
use crate::modules::diagnostics::service::DiagnosticService;
use crate::modules::transcode::service::TranscodeService;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub redis: RedisService,
    pub storage: StorageService,
    pub transcode: TranscodeService,
    pub diagnostics: DiagnosticService,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        redis: RedisService,
        storage: StorageService,
        transcode: TranscodeService,
        diagnostics: DiagnosticService,
    ) -> Self {
        Self {
            config,
            redis,
            storage,
            transcode,
            diagnostics,
        }
    }
}
