//! Application-wide constants
//!
//! Centralized location for the fixed polling cadences and paging
//! values used across multiple modules.

use std::time::Duration;

/// Default backend base URL (dev server)
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Refresh period for the conversation list
pub const CONVERSATION_LIST_PERIOD: Duration = Duration::from_millis(5000);

/// Forward-poll period for the active message window
pub const WINDOW_POLL_PERIOD: Duration = Duration::from_millis(2000);

/// Refresh period for per-row last-message previews
pub const PREVIEW_PERIOD: Duration = Duration::from_millis(5000);

/// Refresh period for the notification feed
pub const NOTIFICATION_PERIOD: Duration = Duration::from_millis(2000);

/// Prefix for locally generated pending-send ids
pub const PENDING_ID_PREFIX: &str = "pending-";
