use serde::Deserialize;

use crate::models::Record;

/// A notification feed entry.
///
/// Structurally the same shape the merge engine needs for messages:
/// immutable id plus server-assigned timestamp.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    #[serde(default)]
    pub text: String,
    pub created_at: u64,
    #[serde(default)]
    pub read: bool,
}

impl Record for Notification {
    fn record_id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> u64 {
        self.created_at
    }
}
