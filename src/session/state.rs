//! Session state
//!
//! Everything one user session holds between events: the query being
//! typed, the pending media selection, the submission phase, the last
//! verdict and the view mode used to display it.

use serde::Serialize;
use std::sync::Arc;

use crate::analysis::{VerificationResult, ViewMode};
use crate::client::ClientError;
use crate::media::{MediaUpload, PreviewHandle};

pub const RATE_LIMIT_MESSAGE: &str = "Rate limit reached. Please wait 60 seconds.";
pub const TIMEOUT_MESSAGE: &str = "AI took too long.";
pub const MEDIA_ERROR_MESSAGE: &str = "Verification Error";
pub const SEARCH_ERROR_MESSAGE: &str = "Search Error";

/// Which endpoint a submission goes to
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionKind {
    Text,
    Media,
}

impl std::fmt::Display for SubmissionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmissionKind::Text => write!(f, "text"),
            SubmissionKind::Media => write!(f, "media"),
        }
    }
}

/// Where the session is in the submission lifecycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Submitting(SubmissionKind),
    Succeeded(SubmissionKind),
    Failed(Notice),
}

impl Phase {
    pub fn is_submitting(&self) -> bool {
        matches!(self, Phase::Submitting(_))
    }
}

/// Category of a user-visible failure message
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    RateLimited,
    Timeout,
    Generic,
}

/// A failure message shown to the user
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    /// Map a client error to the message for a submission kind
    pub fn for_error(error: &ClientError, kind: SubmissionKind) -> Self {
        match error {
            ClientError::RateLimited => Notice {
                kind: NoticeKind::RateLimited,
                message: RATE_LIMIT_MESSAGE.to_string(),
            },
            ClientError::Timeout => Notice {
                kind: NoticeKind::Timeout,
                message: TIMEOUT_MESSAGE.to_string(),
            },
            _ => Notice {
                kind: NoticeKind::Generic,
                message: match kind {
                    SubmissionKind::Media => MEDIA_ERROR_MESSAGE,
                    SubmissionKind::Text => SEARCH_ERROR_MESSAGE,
                }
                .to_string(),
            },
        }
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// A file waiting to be verified, with its preview if it is an image
#[derive(Debug)]
pub struct PendingMedia {
    pub upload: Arc<MediaUpload>,
    pub preview: Option<PreviewHandle>,
}

/// State owned by one session
#[derive(Debug, Default)]
pub struct SessionState {
    pub query: String,
    pub pending: Option<PendingMedia>,
    pub phase: Phase,
    pub result: Option<VerificationResult>,
    pub view_mode: ViewMode,
}

impl SessionState {
    /// Leave a finished phase. A running submission is unaffected.
    pub fn settle(&mut self) {
        if !self.phase.is_submitting() {
            self.phase = Phase::Idle;
        }
    }

    /// The media path runs when a file is selected and nothing is typed
    pub fn prefers_media(&self) -> bool {
        self.pending.is_some() && self.query.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_mapping() {
        let rate = Notice::for_error(&ClientError::RateLimited, SubmissionKind::Media);
        assert_eq!(rate.kind, NoticeKind::RateLimited);
        assert_eq!(rate.message, RATE_LIMIT_MESSAGE);

        let timeout = Notice::for_error(&ClientError::Timeout, SubmissionKind::Media);
        assert_eq!(timeout.message, TIMEOUT_MESSAGE);

        let generic = Notice::for_error(&ClientError::Unavailable, SubmissionKind::Media);
        assert_eq!(generic.kind, NoticeKind::Generic);
        assert_eq!(generic.message, MEDIA_ERROR_MESSAGE);
        assert_ne!(timeout.message, generic.message);

        let text = Notice::for_error(
            &ClientError::ApiError {
                status: 502,
                message: String::new(),
            },
            SubmissionKind::Text,
        );
        assert_eq!(text.message, SEARCH_ERROR_MESSAGE);
    }

    #[test]
    fn test_settle() {
        let mut state = SessionState::default();
        state.phase = Phase::Succeeded(SubmissionKind::Text);
        state.settle();
        assert_eq!(state.phase, Phase::Idle);

        state.phase = Phase::Submitting(SubmissionKind::Media);
        state.settle();
        assert!(state.phase.is_submitting());
    }
}
