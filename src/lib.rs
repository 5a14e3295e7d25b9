//! # FairGPT
//!
//! Client for the FairGPT news-audit service: submit a claim (text, image
//! or PDF) to the verification API and turn the returned verdict into the
//! values the report widgets display.
//!
//! ## Modules
//!
//! - [`analysis`]: Pure derivation layer (sentiment buckets, reliability score, view model)
//! - [`client`]: REST client for `/api/search` and `/api/verify-media`
//! - [`media`]: Upload validation and image previews
//! - [`session`]: Per-session state and the submission controller
//! - [`report`]: Terminal rendering of a view model
//! - [`config`]: TOML + environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fairgpt::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env();
//!     let client = VerifyClient::new(ClientConfig::from(&config.api))?;
//!
//!     let controller = QueryController::new(
//!         Arc::new(client),
//!         PreviewCache::new(),
//!         ControllerOptions::default(),
//!     );
//!
//!     controller.set_query("Is the new 500 rupee note with a star fake?").await;
//!     controller.submit().await;
//!
//!     if let Some(vm) = controller.view_model().await {
//!         println!("{}", fairgpt::report::render_text(&vm));
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod client;
pub mod config;
pub mod logging;
pub mod media;
pub mod report;
pub mod session;

// Re-export top-level types for convenience
pub use analysis::{
    classify, score_reliability, ReliabilitySummary, Sentiment, SentimentCategory, SourceMeta,
    SourceRef, SourceTier, SourceView, TrendPoint, VerificationAudit, VerificationResult,
    ViewMode, ViewModel,
};

pub use client::{ClientConfig, ClientError, VerificationApi, VerifyClient};

pub use config::{ApiConfig, Config, ConfigError, LoggingConfig};

pub use media::{MediaError, MediaUpload, PreviewCache, PreviewHandle};

pub use session::{
    ClipboardItem, ControllerOptions, Notice, NoticeKind, Phase, QueryController,
    SessionSnapshot, SkipReason, SubmissionKind, SubmissionOutcome, EXAMPLE_QUERIES,
};
