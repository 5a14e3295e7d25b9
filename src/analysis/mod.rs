//! Verdict Analysis
//!
//! Pure derivation layer between the verification API and the report
//! widgets.
//!
//! ## Components
//!
//! - **types**: Wire types for the API response, every field optional
//! - **sentiment**: Bias score to one of four sentiment buckets
//! - **reliability**: Tiered source counts to a weighted 0-100 score
//! - **view_model**: Assembles the above into what the widgets render
//!
//! Nothing here performs I/O; building a view model twice from the same
//! result yields the same value.

mod reliability;
mod sentiment;
mod types;
mod view_model;

pub use reliability::{
    score as score_reliability, ReliabilitySummary, SourceTier, TierCount, MIN_DENOMINATOR,
    STRONG_SCORE_ABOVE,
};
pub use sentiment::{
    classify, Sentiment, SentimentCategory, Tone, BALANCED_BELOW, NEUTRAL_BELOW,
    OPINIONATED_BELOW,
};
pub use types::{SourceMeta, SourceRef, TrendPoint, VerificationAudit, VerificationResult};
pub use view_model::{
    SourceView, ViewMode, ViewModel, DEFAULT_LOGIC_AUDIT, DEFAULT_SOURCE_KIND,
    DEFAULT_SOURCE_NAME, DEFAULT_SOURCE_RELIABILITY,
};
