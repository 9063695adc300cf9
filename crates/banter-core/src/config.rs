use std::time::Duration;

use crate::constants;

/// Connection settings for the backend API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Optional bearer token sent on every request.
    pub token: Option<String>,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(constants::DEFAULT_BASE_URL)
    }
}

/// Polling cadences for the four synchronization streams.
///
/// These are design constants, not protocol requirements; callers may
/// tune them per deployment.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub conversation_list_period: Duration,
    pub window_poll_period: Duration,
    pub preview_period: Duration,
    pub notification_period: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            conversation_list_period: constants::CONVERSATION_LIST_PERIOD,
            window_poll_period: constants::WINDOW_POLL_PERIOD,
            preview_period: constants::PREVIEW_PERIOD,
            notification_period: constants::NOTIFICATION_PERIOD,
        }
    }
}
