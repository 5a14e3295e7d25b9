//! Query Sessions
//!
//! A session is one user's search box: the query being typed, an optional
//! image or PDF waiting to be verified, and the last verdict.
//!
//! - **state**: The session data and submission phases
//! - **controller**: Event methods and the submission lifecycle
//! - **presets**: Built-in example claims
//!
//! ## Failure handling
//!
//! | Condition | Media path | Text path |
//! |---|---|---|
//! | blank query / no file | skipped | skipped |
//! | HTTP 429 | rate-limit notice | logged |
//! | timeout | "took too long" notice | logged |
//! | anything else | generic notice | logged |
//!
//! Text failures are shown to the user only when
//! [`ControllerOptions::surface_text_errors`] is set. Nothing is retried.

mod controller;
mod presets;
mod state;

pub use controller::{
    ClipboardItem, ControllerOptions, QueryController, SessionSnapshot, SkipReason,
    SubmissionOutcome,
};
pub use presets::{example, ExampleQuery, EXAMPLE_QUERIES};
pub use state::{
    Notice, NoticeKind, PendingMedia, Phase, SessionState, SubmissionKind, MEDIA_ERROR_MESSAGE,
    RATE_LIMIT_MESSAGE, SEARCH_ERROR_MESSAGE, TIMEOUT_MESSAGE,
};
