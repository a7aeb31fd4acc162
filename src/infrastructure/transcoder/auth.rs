use std::sync::Arc;

use gcp_auth::TokenProvider;
use tokio::sync::RwLock;
use tracing::info;

use super::TranscoderError;

pub const CLOUD_PLATFORM_SCOPES: &[&str] = &["https://www.googleapis.com/auth/cloud-platform"];

enum TokenSource {
    Static(String),
    /// Application Default Credentials, resolved on first use.
    Adc(RwLock<Option<Arc<dyn TokenProvider>>>),
}

/// OAuth2 bearer tokens for Google APIs.
///
/// Production uses Application Default Credentials through `gcp_auth`
/// (`GOOGLE_APPLICATION_CREDENTIALS`, gcloud user credentials or the
/// metadata server). A fixed token is only for tests and local stubs.
pub struct AccessTokenProvider {
    source: TokenSource,
}

impl AccessTokenProvider {
    pub fn application_default() -> Self {
        Self {
            source: TokenSource::Adc(RwLock::new(None)),
        }
    }

    pub fn fixed(token: impl Into<String>) -> Self {
        Self {
            source: TokenSource::Static(token.into()),
        }
    }

    async fn provider(
        slot: &RwLock<Option<Arc<dyn TokenProvider>>>,
    ) -> Result<Arc<dyn TokenProvider>, TranscoderError> {
        if let Some(provider) = slot.read().await.as_ref() {
            return Ok(provider.clone());
        }

        let mut guard = slot.write().await;
        if let Some(provider) = guard.as_ref() {
            return Ok(provider.clone());
        }

        let provider = gcp_auth::provider()
            .await
            .map_err(|e| TranscoderError::Auth(format!("no usable GCP credentials: {e}")))?;
        info!("GCP credentials initialized");
        *guard = Some(provider.clone());
        Ok(provider)
    }

    pub async fn token(&self) -> Result<String, TranscoderError> {
        match &self.source {
            TokenSource::Static(token) => Ok(token.clone()),
            TokenSource::Adc(slot) => {
                let provider = Self::provider(slot).await?;
                let token = provider
                    .token(CLOUD_PLATFORM_SCOPES)
                    .await
                    .map_err(|e| TranscoderError::Auth(format!("failed to get access token: {e}")))?;
                Ok(token.as_str().to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_token_is_returned_as_is() {
        let tokens = AccessTokenProvider::fixed("abc");
        assert_eq!(tokens.token().await.unwrap(), "abc");
    }
}
