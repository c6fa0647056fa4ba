//! Analyze Request Client
//!
//! One multipart `POST /api/analyze` per call. The outcome is either a fully
//! typed [`AnalysisResult`] or a [`ClientError`]; a body that does not match
//! the result shape is never coerced into one.

use crate::capture::SelectedImage;
use crate::error::{ClientError, FALLBACK_MESSAGE};
use async_trait::async_trait;
use crop_core::api::{build_url, ANALYZE_PATH, IMAGE_FIELD, LANGUAGE_FIELD};
use crop_core::{AnalysisResult, ClientConfig, Language};
use reqwest::multipart::{Form, Part};
use std::time::Duration;

/// Submits an image for diagnosis
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Analyze: Send + Sync {
    /// Analyze `image`, asking for a diagnosis in `language`
    async fn analyze(&self, image: &SelectedImage, language: Language) -> Result<AnalysisResult, ClientError>;
}

/// [`Analyze`] over HTTP
#[derive(Debug, Clone)]
pub struct HttpAnalyzeClient {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpAnalyzeClient {
    /// Client for the server at `base_url` with a per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::RequestFailed(e.to_string()))?;
        Ok(Self::with_http(http, base_url))
    }

    /// Client from configuration
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::new(&config.base_url, config.request_timeout())
    }

    /// Reuse an existing `reqwest` client
    #[must_use]
    pub fn with_http(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            endpoint: build_url(base_url, ANALYZE_PATH),
        }
    }

    /// Full URL requests are sent to
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn form(image: &SelectedImage, language: Language) -> Result<Form, ClientError> {
        let part = Part::bytes(image.bytes.to_vec())
            .file_name(image.name.clone())
            .mime_str(&image.content_type)
            .map_err(|e| ClientError::RequestFailed(e.to_string()))?;
        Ok(Form::new()
            .part(IMAGE_FIELD, part)
            .text(LANGUAGE_FIELD, language.code()))
    }
}

#[async_trait]
impl Analyze for HttpAnalyzeClient {
    async fn analyze(&self, image: &SelectedImage, language: Language) -> Result<AnalysisResult, ClientError> {
        tracing::debug!(
            endpoint = %self.endpoint,
            image = %image.name,
            bytes = image.bytes.len(),
            %language,
            "sending analyze request"
        );

        let response = self
            .http
            .post(&self.endpoint)
            .multipart(Self::form(image, language)?)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, timeout = e.is_timeout(), "analyze request did not complete");
                ClientError::RequestFailed(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::warn!(%status, body = %text, "analyze request rejected");
            let message = if text.trim().is_empty() {
                FALLBACK_MESSAGE.to_string()
            } else {
                text
            };
            return Err(ClientError::RequestFailed(message));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::RequestFailed(e.to_string()))?;
        serde_json::from_slice::<AnalysisResult>(&body).map_err(|e| {
            tracing::warn!(error = %e, "analyze response does not match the result shape");
            ClientError::MalformedResponse(e.to_string())
        })
    }
}
