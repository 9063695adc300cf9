//! State for the one active conversation: the confirmed message
//! sequence, optimistic sends awaiting confirmation, and the member
//! list shown in the header.
//!
//! Single-writer discipline: nothing outside this type mutates the
//! sequence. Every fetch captures `(conversation_id, generation)` at
//! issue time; a response whose generation no longer matches is
//! discarded on arrival, which is the whole cancellation story for
//! conversation switches (requests cannot be aborted on the wire).

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::api::Gateway;
use crate::error::{SendError, SyncError};
use crate::models::{Draft, Message, PendingSend, User};
use crate::sync::merge;
use crate::sync::stream::{TickGate, TickOutcome};

#[derive(Debug, Default)]
struct WindowState {
    conversation_id: Option<String>,
    generation: u64,
    messages: Vec<Message>,
    pending: Vec<PendingSend>,
    members: Vec<User>,
    loading_older: bool,
}

/// Read-only copy of the window for rendering.
#[derive(Debug, Clone, Default)]
pub struct WindowSnapshot {
    pub conversation_id: Option<String>,
    pub messages: Vec<Message>,
    pub pending: Vec<PendingSend>,
    pub members: Vec<User>,
}

pub struct MessageWindow<G> {
    gateway: Arc<G>,
    /// Our own user id, used to recognize canonical counterparts of
    /// optimistic sends.
    me: String,
    state: Mutex<WindowState>,
    poll_gate: TickGate,
}

impl<G: Gateway> MessageWindow<G> {
    pub fn new(gateway: Arc<G>, me: impl Into<String>) -> Self {
        Self {
            gateway,
            me: me.into(),
            state: Mutex::new(WindowState::default()),
            poll_gate: TickGate::new(),
        }
    }

    /// Switch the window to `conversation_id`: reset the sequence,
    /// orphan any in-flight responses for the old conversation, then
    /// load the most recent page and the member list.
    pub async fn open(&self, conversation_id: impl Into<String>) -> Result<(), SyncError> {
        let conversation_id = conversation_id.into();
        let generation = {
            let mut state = self.state.lock();
            state.generation += 1;
            state.conversation_id = Some(conversation_id.clone());
            state.messages.clear();
            state.pending.clear();
            state.members.clear();
            state.loading_older = false;
            state.generation
        };

        let page = self.gateway.messages(&conversation_id, 0).await?;
        let members = self.gateway.members(&conversation_id).await?;

        let mut state = self.state.lock();
        if state.generation == generation {
            state.messages = merge::merge_newer(std::mem::take(&mut state.messages), page);
            state.members = members;
        }
        Ok(())
    }

    /// Tear the window down: cancel nothing on the wire, just advance
    /// the generation so stragglers are ignored on arrival.
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.generation += 1;
        state.conversation_id = None;
        state.messages.clear();
        state.pending.clear();
        state.members.clear();
        state.loading_older = false;
    }

    /// One forward-poll tick: refetch the most recent page and merge.
    /// Skipped outright while another poll is outstanding.
    pub async fn poll_once(&self) -> Result<TickOutcome, SyncError> {
        let Some(_permit) = self.poll_gate.acquire() else {
            return Ok(TickOutcome::Skipped);
        };

        let (conversation_id, generation) = {
            let state = self.state.lock();
            match &state.conversation_id {
                Some(id) => (id.clone(), state.generation),
                None => return Ok(TickOutcome::Idle),
            }
        };

        let page = self.gateway.messages(&conversation_id, 0).await?;

        let mut state = self.state.lock();
        if state.generation != generation {
            debug!(conversation = %conversation_id, "discarding stale poll response");
            return Ok(TickOutcome::Stale);
        }
        let before = state.messages.len();
        state.messages = merge::merge_newer(std::mem::take(&mut state.messages), page);
        let added = state.messages.len() - before;
        Self::reconcile_pending(&mut state);
        Ok(TickOutcome::Merged(added))
    }

    /// Fetch the page preceding the loaded range and prepend it.
    /// User-initiated one-shot, guarded by a boolean in-flight flag
    /// rather than the generation.
    pub async fn load_older(&self) -> Result<TickOutcome, SyncError> {
        let (conversation_id, generation, offset) = {
            let mut state = self.state.lock();
            let Some(id) = state.conversation_id.clone() else {
                return Ok(TickOutcome::Idle);
            };
            if state.loading_older {
                return Ok(TickOutcome::Skipped);
            }
            state.loading_older = true;
            (id, state.generation, state.messages.len())
        };

        let result = self.gateway.messages(&conversation_id, offset).await;

        let mut state = self.state.lock();
        if state.generation != generation {
            // The switch already reset loading_older along with the rest.
            debug!(conversation = %conversation_id, "discarding stale load-older response");
            return Ok(TickOutcome::Stale);
        }
        state.loading_older = false;
        let page = result?;
        let before = state.messages.len();
        state.messages = merge::merge_older(std::mem::take(&mut state.messages), page);
        Ok(TickOutcome::Merged(state.messages.len() - before))
    }

    /// Optimistically insert the draft, post it, then force an extra
    /// forward poll so the canonical record supersedes the pending one
    /// with minimal latency. On failure the pending entry is rolled
    /// back and the draft handed back for retry.
    pub async fn send(&self, draft: Draft) -> Result<(), SendError> {
        let (conversation_id, generation, local_id) = {
            let mut state = self.state.lock();
            let Some(id) = state.conversation_id.clone() else {
                return Err(SendError {
                    draft,
                    source: SyncError::NoActiveConversation,
                });
            };
            let pending = PendingSend::new(&draft, self.me.clone());
            let local_id = pending.local_id.clone();
            state.pending.push(pending);
            (id, state.generation, local_id)
        };

        match self.gateway.send_message(&conversation_id, &draft).await {
            Ok(()) => {
                if let Err(err) = self.poll_once().await {
                    // Best effort: the next scheduled tick will pick
                    // the canonical message up instead.
                    debug!(error = %err, "post-send poll failed");
                }
                Ok(())
            }
            Err(err) => {
                let mut state = self.state.lock();
                if state.generation == generation {
                    state.pending.retain(|p| p.local_id != local_id);
                }
                Err(SendError {
                    draft,
                    source: err.into(),
                })
            }
        }
    }

    pub fn snapshot(&self) -> WindowSnapshot {
        let state = self.state.lock();
        WindowSnapshot {
            conversation_id: state.conversation_id.clone(),
            messages: state.messages.clone(),
            pending: state.pending.clone(),
            members: state.members.clone(),
        }
    }

    pub fn skipped_polls(&self) -> u64 {
        self.poll_gate.skipped_ticks()
    }

    fn reconcile_pending(state: &mut WindowState) {
        let messages = &state.messages;
        state
            .pending
            .retain(|p| !messages.iter().any(|m| p.is_confirmed_by(m)));
    }
}
