//! Verification API REST Client
//!
//! HTTP client for the remote verification API.

use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

use super::VerificationApi;
use crate::analysis::VerificationResult;
use crate::config::ApiConfig;
use crate::media::MediaUpload;

/// Client-side deadline for media verification
pub const DEFAULT_MEDIA_TIMEOUT_MS: u64 = 45_000;

/// Verification API REST client
pub struct VerifyClient {
    client: Client,
    config: ClientConfig,
}

/// Configuration for the verification client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL for the API (e.g., "https://api.example.org")
    pub base_url: String,
    /// Deadline for `/api/verify-media`, in milliseconds
    pub media_timeout_ms: u64,
    /// Deadline for `/api/search`, in milliseconds. `None` waits indefinitely.
    pub text_timeout_ms: Option<u64>,
    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            media_timeout_ms: DEFAULT_MEDIA_TIMEOUT_MS,
            text_timeout_ms: Some(DEFAULT_MEDIA_TIMEOUT_MS),
            user_agent: format!("fairgpt/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl From<&ApiConfig> for ClientConfig {
    /// Media uploads always carry a deadline, so a media timeout of 0 falls
    /// back to the default. A text timeout of 0 means no deadline.
    fn from(api: &ApiConfig) -> Self {
        let media_timeout_ms = match api.media_timeout_secs {
            0 => DEFAULT_MEDIA_TIMEOUT_MS,
            secs => secs.saturating_mul(1000),
        };

        Self {
            base_url: api.base_url.clone(),
            media_timeout_ms,
            text_timeout_ms: (api.text_timeout_secs > 0)
                .then(|| api.text_timeout_secs.saturating_mul(1000)),
            user_agent: api.user_agent.clone(),
        }
    }
}

impl VerifyClient {
    /// Create a new client with the given configuration
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        if config.base_url.trim().is_empty() {
            return Err(ClientError::MissingBaseUrl);
        }

        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(ClientError::Request)?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Submit a text claim
    pub async fn search(&self, query: &str) -> Result<VerificationResult, ClientError> {
        let url = self.endpoint("/api/search");
        let mut request = self.client.post(&url).json(&SearchRequest { query });
        if let Some(ms) = self.config.text_timeout_ms {
            request = request.timeout(Duration::from_millis(ms));
        }

        tracing::debug!(url = %url, "Submitting text claim");
        self.send(request).await
    }

    /// Submit an image or PDF
    pub async fn verify_media(
        &self,
        upload: &MediaUpload,
    ) -> Result<VerificationResult, ClientError> {
        let url = self.endpoint("/api/verify-media");

        let part = Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone())
            .mime_str(&upload.mime)
            .map_err(|e| ClientError::InvalidUpload(e.to_string()))?;
        let form = Form::new().part("file", part);

        let request = self
            .client
            .post(&url)
            .multipart(form)
            .timeout(Duration::from_millis(self.config.media_timeout_ms));

        tracing::debug!(
            url = %url,
            file = %upload.file_name,
            bytes = upload.size(),
            "Submitting media"
        );
        self.send(request).await
    }

    /// Send a request and decode a verdict. No retries.
    async fn send(&self, request: RequestBuilder) -> Result<VerificationResult, ClientError> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            tracing::warn!(retry_after_secs = ?retry_after, "Verification API rate limited");
            return Err(ClientError::RateLimited);
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ClientError::ApiError {
                status: status.as_u16(),
                message: text,
            });
        }

        // The deadline covers the body too, so a stalled body still times out.
        let body = response.bytes().await.map_err(transport_error)?;
        VerificationResult::from_json(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[async_trait::async_trait]
impl VerificationApi for VerifyClient {
    async fn search(&self, query: &str) -> Result<VerificationResult, ClientError> {
        VerifyClient::search(self, query).await
    }

    async fn verify_media(
        &self,
        upload: &MediaUpload,
    ) -> Result<VerificationResult, ClientError> {
        VerifyClient::verify_media(self, upload).await
    }
}

fn transport_error(e: reqwest::Error) -> ClientError {
    if e.is_timeout() {
        ClientError::Timeout
    } else if e.is_connect() {
        ClientError::Unavailable
    } else {
        ClientError::Request(e)
    }
}

// ============================================
// Request DTOs
// ============================================

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
}

// ============================================
// Errors
// ============================================

/// Errors that can occur when calling the verification API
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Verification API unavailable")]
    Unavailable,

    #[error("No API base URL configured (set FAIRGPT_API_URL or --api-url)")]
    MissingBaseUrl,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Request timeout")]
    Timeout,

    #[error("Rate limited")]
    RateLimited,

    #[error("Invalid response body: {0}")]
    Decode(String),

    #[error("Invalid upload: {0}")]
    InvalidUpload(String),
}
