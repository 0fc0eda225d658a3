//! Speech service client — renders guide text as playable audio.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::Language;
use crate::error::AudioError;

/// The opaque speech-synthesis capability. Returns a playable resource
/// locator; one attempt per call.
#[async_trait]
pub trait SpeechService: Send + Sync {
    async fn synthesize(&self, text: &str, language: Language) -> Result<String, AudioError>;
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    language: Language,
}

#[derive(Debug, Deserialize)]
struct SpeechResponse {
    #[serde(rename = "audioUrl")]
    audio_url: String,
}

/// HTTP JSON implementation of the speech contract.
pub struct HttpSpeechService {
    client: reqwest::Client,
    endpoint: String,
    auth_token: Option<SecretString>,
}

impl HttpSpeechService {
    pub fn new(endpoint: impl Into<String>, auth_token: Option<SecretString>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            auth_token,
        }
    }
}

#[async_trait]
impl SpeechService for HttpSpeechService {
    async fn synthesize(&self, text: &str, language: Language) -> Result<String, AudioError> {
        debug!(language = %language, chars = text.len(), "Requesting audio synthesis");

        let mut http = self
            .client
            .post(&self.endpoint)
            .json(&SpeechRequest { text, language });
        if let Some(token) = &self.auth_token {
            http = http.bearer_auth(token.expose_secret());
        }

        let response = http.send().await.map_err(|e| AudioError::SynthesisFailed {
            reason: e.to_string(),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AudioError::SynthesisFailed {
                reason: format!("speech service returned {status}"),
            });
        }

        let body: SpeechResponse =
            response.json().await.map_err(|e| AudioError::SynthesisFailed {
                reason: format!("invalid response body: {e}"),
            })?;

        if body.audio_url.trim().is_empty() {
            return Err(AudioError::SynthesisFailed {
                reason: "speech service returned an empty audioUrl".to_string(),
            });
        }
        Ok(body.audio_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speech_request_wire_format() {
        let request = SpeechRequest {
            text: "Hello",
            language: Language::Fr,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["text"], "Hello");
        assert_eq!(json["language"], "fr");
    }

    #[test]
    fn speech_response_parses_audio_url() {
        let body: SpeechResponse =
            serde_json::from_str(r#"{"audioUrl": "https://cdn.example/a.mp3"}"#).unwrap();
        assert_eq!(body.audio_url, "https://cdn.example/a.mp3");
    }
}
