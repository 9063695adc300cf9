use crate::models::Draft;

/// Transport-level failure talking to the backend.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("backend returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Failure of a single fetch-and-merge tick.
///
/// Ticks return this internally so outcomes stay observable; the
/// scheduler logs it and keeps polling rather than surfacing it to
/// callers. Only the send path propagates errors upward.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("no active conversation")]
    NoActiveConversation,
}

/// A rejected outbound message.
///
/// Carries the draft back to the caller so the typed text can be
/// restored into the input for retry; nothing is silently lost.
#[derive(Debug, thiserror::Error)]
#[error("failed to send message: {source}")]
pub struct SendError {
    pub draft: Draft,
    #[source]
    pub source: SyncError,
}
