//! Per-conversation-row last-message previews.
//!
//! The degenerate, reorder-free case of the merge engine: each row
//! holds at most one message, and a fetched value replaces the held
//! one only when it is at least as recent. Replacement uses the merge
//! engine's comparison primitive rather than its own.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::api::Gateway;
use crate::error::SyncError;
use crate::models::Message;
use crate::sync::merge;
use crate::sync::stream::{TickGate, TickOutcome};

pub struct PreviewCache<G> {
    gateway: Arc<G>,
    previews: Mutex<HashMap<String, Message>>,
    gate: TickGate,
}

impl<G: Gateway> PreviewCache<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            previews: Mutex::new(HashMap::new()),
            gate: TickGate::new(),
        }
    }

    /// Refresh the preview for one row. An older fetch result never
    /// regresses the held preview.
    pub async fn refresh(&self, conversation_id: &str) -> Result<TickOutcome, SyncError> {
        let fetched = self.gateway.last_message(conversation_id).await?;
        let Some(fetched) = fetched else {
            return Ok(TickOutcome::Merged(0));
        };

        let mut previews = self.previews.lock();
        let replaced = match previews.get(conversation_id) {
            Some(held) if !merge::supersedes(&fetched, held) => false,
            _ => {
                previews.insert(conversation_id.to_string(), fetched);
                true
            }
        };
        Ok(TickOutcome::Merged(usize::from(replaced)))
    }

    /// One tick of the preview stream: refresh every listed row.
    /// Rows touch disjoint map slots, so a single gate over the whole
    /// sweep is enough to keep one request in flight. Rows are
    /// independent: a failing row is logged and skipped, the sweep
    /// continues, and the row is retried on the next tick.
    pub async fn refresh_all(&self, conversation_ids: &[String]) -> Result<TickOutcome, SyncError> {
        let Some(_permit) = self.gate.acquire() else {
            return Ok(TickOutcome::Skipped);
        };

        let mut replaced = 0;
        for id in conversation_ids {
            match self.refresh(id).await {
                Ok(TickOutcome::Merged(n)) => replaced += n,
                Ok(_) => {}
                Err(err) => {
                    debug!(conversation = %id, error = %err, "preview refresh failed");
                }
            }
        }
        Ok(TickOutcome::Merged(replaced))
    }

    pub fn last_message(&self, conversation_id: &str) -> Option<Message> {
        self.previews.lock().get(conversation_id).cloned()
    }

    /// Drop previews for rows that disappeared from the directory.
    pub fn retain(&self, conversation_ids: &[String]) {
        let mut previews = self.previews.lock();
        previews.retain(|id, _| conversation_ids.iter().any(|c| c == id));
    }
}
