//! HeyGen-backed translation provider.
//!
//! Submits stored media to the HeyGen video-translate API. The adapter only
//! performs the submission; completion arrives later through the outcome
//! callback route.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;

use super::{ProviderError, TranslationProvider};
use crate::language::Language;

const DEFAULT_BASE_URL: &str = "https://api.heygen.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum length for error bodies kept in errors/logs.
const MAX_ERROR_BODY_LENGTH: usize = 200;

/// Truncates a provider error body so tokens or large payloads never
/// end up in logs verbatim.
fn sanitize_error_body(body: &str) -> String {
    if body.len() > MAX_ERROR_BODY_LENGTH {
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated)", &body[..end])
    } else {
        body.to_string()
    }
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    data: Option<SubmitData>,
}

#[derive(Debug, Deserialize)]
struct SubmitData {
    video_translate_id: Option<String>,
}

/// Translation provider backed by the HeyGen API.
pub struct HeyGenProvider {
    client: Client,
    api_key: SecretString,
    base_url: String,
}

impl HeyGenProvider {
    /// Creates a provider using the default HeyGen endpoint.
    pub fn new(api_key: SecretString) -> Result<Self, ProviderError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Creates a provider against a custom endpoint (used in tests).
    pub fn with_base_url(api_key: SecretString, base_url: &str) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl TranslationProvider for HeyGenProvider {
    async fn submit(
        &self,
        file_handle: &str,
        target_language: Language,
    ) -> Result<String, ProviderError> {
        let url = format!("{}/v2/video_translate", self.base_url);
        debug!(
            "Submitting translation to HeyGen: language={}",
            target_language
        );

        let response = self
            .client
            .post(&url)
            .header("x-api-key", self.api_key.expose_secret())
            .json(&json!({
                "video_path": file_handle,
                "output_language": target_language.code(),
            }))
            .send()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Rejected {
                status: status.as_u16(),
                body: sanitize_error_body(&body),
            });
        }

        let parsed: SubmitResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Request(e.to_string()))?;

        let provider_job_id = parsed
            .data
            .and_then(|d| d.video_translate_id)
            .ok_or(ProviderError::MalformedResponse("data.video_translate_id"))?;

        info!("HeyGen accepted submission: {}", provider_job_id);
        Ok(provider_job_id)
    }

    fn name(&self) -> &'static str {
        "heygen"
    }
}
