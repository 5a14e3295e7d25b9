//! Query Submission Controller
//!
//! Drives one session's request lifecycle:
//!
//! `Idle -> Submitting -> { Succeeded | Failed } -> Idle`
//!
//! Every user event is one method. The state lives behind a lock so a UI
//! can read the loading flag while a submission is awaiting the API; a
//! second submission while one is in flight is refused.

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

use super::state::{Notice, PendingMedia, Phase, SessionState, SubmissionKind};
use crate::analysis::{VerificationResult, ViewMode, ViewModel};
use crate::client::{ClientError, VerificationApi};
use crate::media::{MediaUpload, PreviewCache};

/// Controller behavior switches
#[derive(Debug, Clone, Default)]
pub struct ControllerOptions {
    /// Report text-query failures to the user instead of only logging them
    pub surface_text_errors: bool,
}

/// Why a submission was not attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Query empty after trimming
    BlankQuery,
    /// Media submission without a selected file
    NoMedia,
    /// Another submission is still running
    InFlight,
}

/// Result of one submit event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Skipped(SkipReason),
    Succeeded(SubmissionKind),
    /// `notice` is `None` when the failure is only logged
    Failed {
        kind: SubmissionKind,
        notice: Option<Notice>,
    },
}

/// One item of a clipboard paste
#[derive(Debug, Clone)]
pub enum ClipboardItem {
    Image(MediaUpload),
    Text(String),
    /// Anything else; ignored
    Other(String),
}

/// Read-only view of the session for rendering controls
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub query: String,
    pub phase: Phase,
    pub loading: bool,
    pub pending_file: Option<String>,
    pub preview_url: Option<String>,
    pub view_mode: ViewMode,
    pub has_result: bool,
}

/// Owns a session and submits its claims to the verification API
pub struct QueryController {
    api: Arc<dyn VerificationApi>,
    state: Arc<RwLock<SessionState>>,
    previews: PreviewCache,
    options: ControllerOptions,
}

impl QueryController {
    /// Create a controller with an empty session
    pub fn new(
        api: Arc<dyn VerificationApi>,
        previews: PreviewCache,
        options: ControllerOptions,
    ) -> Self {
        Self {
            api,
            state: Arc::new(RwLock::new(SessionState::default())),
            previews,
            options,
        }
    }

    /// Replace the query text
    pub async fn set_query(&self, text: impl Into<String>) {
        let mut state = self.state.write().await;
        state.settle();
        state.query = text.into();
    }

    /// Select a file for verification. Clears the query; images get a preview.
    ///
    /// Any previous selection (and its preview) is released.
    pub async fn select_media(&self, upload: MediaUpload) {
        let preview = match self.previews.create(&upload) {
            Ok(preview) => preview,
            Err(e) => {
                tracing::warn!(file = %upload.file_name, error = %e, "Preview unavailable");
                None
            }
        };

        tracing::debug!(file = %upload.file_name, mime = %upload.mime, "Media selected");

        let mut state = self.state.write().await;
        state.settle();
        state.query.clear();
        state.pending = Some(PendingMedia {
            upload: Arc::new(upload),
            preview,
        });
    }

    /// Drop the current selection and its preview
    pub async fn clear_media(&self) {
        let mut state = self.state.write().await;
        state.settle();
        state.pending = None;
    }

    /// Apply clipboard items in order: images select media, text replaces the query
    pub async fn paste(&self, items: Vec<ClipboardItem>) {
        for item in items {
            match item {
                ClipboardItem::Image(upload) => self.select_media(upload).await,
                ClipboardItem::Text(text) => self.set_query(text).await,
                ClipboardItem::Other(kind) => {
                    tracing::debug!(kind = %kind, "Ignoring pasted item");
                }
            }
        }
    }

    pub async fn set_view_mode(&self, mode: ViewMode) {
        self.state.write().await.view_mode = mode;
    }

    /// Switch between the consensus and alternative narratives
    pub async fn toggle_view_mode(&self) -> ViewMode {
        let mut state = self.state.write().await;
        state.view_mode = state.view_mode.toggled();
        state.view_mode
    }

    /// Acknowledge a finished submission and return to idle
    pub async fn dismiss(&self) {
        self.state.write().await.settle();
    }

    /// Submit whatever the session holds.
    ///
    /// A selected file with an empty query goes to the media endpoint;
    /// anything else is treated as a text claim.
    pub async fn submit(&self) -> SubmissionOutcome {
        let prefers_media = self.state.read().await.prefers_media();
        if prefers_media {
            self.submit_media().await
        } else {
            self.submit_text().await
        }
    }

    /// Submit the current query text
    pub async fn submit_text(&self) -> SubmissionOutcome {
        self.run_text(None).await
    }

    /// Submit an explicit claim, e.g. one of the built-in examples
    pub async fn submit_with(&self, query: &str) -> SubmissionOutcome {
        self.run_text(Some(query)).await
    }

    async fn run_text(&self, forced: Option<&str>) -> SubmissionOutcome {
        let kind = SubmissionKind::Text;
        let query = {
            let mut state = self.state.write().await;
            if state.phase.is_submitting() {
                return SubmissionOutcome::Skipped(SkipReason::InFlight);
            }

            let raw = forced.map(str::to_string).unwrap_or_else(|| state.query.clone());
            let query = raw.trim().to_string();
            if query.is_empty() {
                return SubmissionOutcome::Skipped(SkipReason::BlankQuery);
            }

            if forced.is_some() {
                state.query = raw;
            }
            state.phase = Phase::Submitting(kind);
            state.result = None;
            state.view_mode = ViewMode::Consensus;
            query
        };

        let submission_id = uuid::Uuid::new_v4();
        let started = Instant::now();
        tracing::info!(submission_id = %submission_id, kind = %kind, "Submitting claim");

        let response = self.api.search(&query).await;

        let mut state = self.state.write().await;
        match response {
            Ok(result) => {
                tracing::info!(
                    submission_id = %submission_id,
                    kind = %kind,
                    status = "succeeded",
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Claim verified"
                );
                state.result = Some(result);
                state.query.clear();
                state.phase = Phase::Succeeded(kind);
                SubmissionOutcome::Succeeded(kind)
            }
            Err(e) => {
                tracing::error!(
                    submission_id = %submission_id,
                    kind = %kind,
                    status = "failed",
                    error = %e,
                    "Search Error"
                );
                if self.options.surface_text_errors {
                    let notice = Notice::for_error(&e, kind);
                    state.phase = Phase::Failed(notice.clone());
                    SubmissionOutcome::Failed {
                        kind,
                        notice: Some(notice),
                    }
                } else {
                    state.phase = Phase::Idle;
                    SubmissionOutcome::Failed { kind, notice: None }
                }
            }
        }
    }

    /// Submit the selected file
    pub async fn submit_media(&self) -> SubmissionOutcome {
        let kind = SubmissionKind::Media;
        let upload = {
            let mut state = self.state.write().await;
            if state.phase.is_submitting() {
                return SubmissionOutcome::Skipped(SkipReason::InFlight);
            }
            let upload = match &state.pending {
                Some(pending) => Arc::clone(&pending.upload),
                None => return SubmissionOutcome::Skipped(SkipReason::NoMedia),
            };
            state.phase = Phase::Submitting(kind);
            upload
        };

        let submission_id = uuid::Uuid::new_v4();
        let started = Instant::now();
        tracing::info!(
            submission_id = %submission_id,
            kind = %kind,
            file = %upload.file_name,
            "Submitting media"
        );

        let response = self.api.verify_media(&upload).await;

        let mut state = self.state.write().await;
        match response {
            Ok(result) => {
                tracing::info!(
                    submission_id = %submission_id,
                    kind = %kind,
                    status = "succeeded",
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Media verified"
                );
                state.result = Some(result);
                state.query.clear();
                // Only clear the selection that was submitted; a file picked
                // while the request ran stays selected.
                let submitted = state
                    .pending
                    .as_ref()
                    .is_some_and(|p| Arc::ptr_eq(&p.upload, &upload));
                if submitted {
                    state.pending = None;
                }
                state.phase = Phase::Succeeded(kind);
                SubmissionOutcome::Succeeded(kind)
            }
            Err(e) => {
                let notice = Notice::for_error(&e, kind);
                if matches!(e, ClientError::RateLimited) {
                    tracing::warn!(submission_id = %submission_id, status = "rate_limited", "Media verification rate limited");
                } else {
                    tracing::error!(
                        submission_id = %submission_id,
                        kind = %kind,
                        status = "failed",
                        error = %e,
                        "Verification Error"
                    );
                }
                state.phase = Phase::Failed(notice.clone());
                SubmissionOutcome::Failed {
                    kind,
                    notice: Some(notice),
                }
            }
        }
    }

    /// View model of the stored verdict in the current view mode
    pub async fn view_model(&self) -> Option<ViewModel> {
        let state = self.state.read().await;
        state
            .result
            .as_ref()
            .map(|raw| ViewModel::build(raw, state.view_mode))
    }

    /// The stored raw verdict
    pub async fn result(&self) -> Option<VerificationResult> {
        self.state.read().await.result.clone()
    }

    pub async fn phase(&self) -> Phase {
        self.state.read().await.phase.clone()
    }

    /// True while a submission is awaiting the API
    pub async fn is_loading(&self) -> bool {
        self.state.read().await.phase.is_submitting()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.read().await;
        SessionSnapshot {
            query: state.query.clone(),
            phase: state.phase.clone(),
            loading: state.phase.is_submitting(),
            pending_file: state.pending.as_ref().map(|p| p.upload.file_name.clone()),
            preview_url: state
                .pending
                .as_ref()
                .and_then(|p| p.preview.as_ref())
                .map(|preview| preview.url()),
            view_mode: state.view_mode,
            has_result: state.result.is_some(),
        }
    }

    /// Preview bookkeeping for this session
    pub fn previews(&self) -> &PreviewCache {
        &self.previews
    }
}
