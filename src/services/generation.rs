//! Generation service client — turns a completed interview into raw guidance.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::error::GuidanceError;
use crate::guidance::GuidanceRequest;

/// The opaque text-generation capability.
///
/// One attempt per call; the caller surfaces failure as a retryable
/// artifact state, never retries automatically. Implementations return the
/// raw response body — validation into a `GuidanceResult` happens in the
/// response model, not here.
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate(&self, request: &GuidanceRequest) -> Result<serde_json::Value, GuidanceError>;
}

/// HTTP JSON implementation of the generation contract.
pub struct HttpGenerationService {
    client: reqwest::Client,
    endpoint: String,
    auth_token: Option<SecretString>,
}

impl HttpGenerationService {
    pub fn new(endpoint: impl Into<String>, auth_token: Option<SecretString>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            auth_token,
        }
    }
}

#[async_trait]
impl GenerationService for HttpGenerationService {
    async fn generate(&self, request: &GuidanceRequest) -> Result<serde_json::Value, GuidanceError> {
        debug!(flow_id = %request.flow_id, language = %request.language, "Requesting guidance generation");

        let mut http = self.client.post(&self.endpoint).json(request);
        if let Some(token) = &self.auth_token {
            http = http.bearer_auth(token.expose_secret());
        }

        let response = http.send().await.map_err(|e| GuidanceError::GenerationFailed {
            reason: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(GuidanceError::GenerationFailed {
                reason: format!("generation service returned {status}"),
            });
        }

        response
            .json()
            .await
            .map_err(|e| GuidanceError::GenerationFailed {
                reason: format!("invalid response body: {e}"),
            })
    }
}
