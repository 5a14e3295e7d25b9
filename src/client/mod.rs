//! Verification API Client
//!
//! Two endpoints, both returning a [`VerificationResult`]:
//!
//! - `POST /api/search` - JSON body `{ "query": ... }`
//! - `POST /api/verify-media` - multipart body with a `file` field
//!
//! [`VerificationApi`] is the seam the session controller talks to;
//! [`VerifyClient`] is its `reqwest` implementation.

mod http;

pub use http::{ClientConfig, ClientError, VerifyClient, DEFAULT_MEDIA_TIMEOUT_MS};

use async_trait::async_trait;

use crate::analysis::VerificationResult;
use crate::media::MediaUpload;

/// Remote verification service
#[async_trait]
pub trait VerificationApi: Send + Sync {
    /// Verify a text claim
    async fn search(&self, query: &str) -> Result<VerificationResult, ClientError>;

    /// Verify an image or PDF
    async fn verify_media(&self, upload: &MediaUpload)
        -> Result<VerificationResult, ClientError>;
}
