//! The conversation list and the active-conversation selection.
//!
//! The backend offers no partial-update contract for conversations,
//! so every refresh replaces the whole list. Rows keep stable ids, so
//! consumers can diff by id across refreshes.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::api::Gateway;
use crate::error::SyncError;
use crate::models::Conversation;
use crate::sync::stream::{TickGate, TickOutcome};

#[derive(Debug, Default)]
struct DirectoryState {
    conversations: Vec<Conversation>,
    selected: Option<String>,
}

pub struct ConversationDirectory<G> {
    gateway: Arc<G>,
    state: Mutex<DirectoryState>,
    gate: TickGate,
}

impl<G: Gateway> ConversationDirectory<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            state: Mutex::new(DirectoryState::default()),
            gate: TickGate::new(),
        }
    }

    /// One refresh tick: fetch the full list and replace wholesale.
    /// When nothing is selected yet, the first row becomes selected
    /// (the caller is expected to open the window for it).
    pub async fn refresh(&self) -> Result<TickOutcome, SyncError> {
        let Some(_permit) = self.gate.acquire() else {
            return Ok(TickOutcome::Skipped);
        };

        let conversations = self.gateway.conversations().await?;

        let mut state = self.state.lock();
        let count = conversations.len();
        state.conversations = conversations;
        if state.selected.is_none() {
            state.selected = state.conversations.first().map(|c| c.id.clone());
        }
        Ok(TickOutcome::Merged(count))
    }

    /// Make `id` the active conversation. Returns true when the
    /// selection actually changed.
    pub fn select(&self, id: impl Into<String>) -> bool {
        let id = id.into();
        let mut state = self.state.lock();
        if state.selected.as_deref() == Some(id.as_str()) {
            return false;
        }
        state.selected = Some(id);
        true
    }

    pub fn selected(&self) -> Option<String> {
        self.state.lock().selected.clone()
    }

    pub fn conversations(&self) -> Vec<Conversation> {
        self.state.lock().conversations.clone()
    }

    pub fn get(&self, id: &str) -> Option<Conversation> {
        self.state
            .lock()
            .conversations
            .iter()
            .find(|c| c.id == id)
            .cloned()
    }
}
