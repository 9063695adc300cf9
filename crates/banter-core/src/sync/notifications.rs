//! The notification feed and unread badge.
//!
//! Structurally the same problem as the message window: a pull-only
//! feed merged through the same engine, forward polls at skip 0 and
//! backward pagination at the current length. No generation is needed
//! because there is only ever one feed, never a context switch.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::warn;

use crate::api::Gateway;
use crate::error::SyncError;
use crate::models::Notification;
use crate::sync::merge;
use crate::sync::stream::{TickGate, TickOutcome};

#[derive(Debug, Default)]
struct FeedState {
    items: Vec<Notification>,
    loading_older: bool,
}

pub struct NotificationFeed<G> {
    gateway: Arc<G>,
    state: Mutex<FeedState>,
    gate: TickGate,
}

impl<G: Gateway> NotificationFeed<G> {
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            state: Mutex::new(FeedState::default()),
            gate: TickGate::new(),
        }
    }

    /// One forward-poll tick at skip 0.
    pub async fn poll_once(&self) -> Result<TickOutcome, SyncError> {
        let Some(_permit) = self.gate.acquire() else {
            return Ok(TickOutcome::Skipped);
        };

        let page = self.gateway.notifications(0).await?;

        let mut state = self.state.lock();
        let before = state.items.len();
        state.items = merge::merge_newer(std::mem::take(&mut state.items), page);
        Ok(TickOutcome::Merged(state.items.len() - before))
    }

    /// Page backwards through notification history.
    pub async fn load_older(&self) -> Result<TickOutcome, SyncError> {
        let offset = {
            let mut state = self.state.lock();
            if state.loading_older {
                return Ok(TickOutcome::Skipped);
            }
            state.loading_older = true;
            state.items.len()
        };

        let result = self.gateway.notifications(offset).await;

        let mut state = self.state.lock();
        state.loading_older = false;
        let page = result?;
        let before = state.items.len();
        state.items = merge::merge_older(std::mem::take(&mut state.items), page);
        Ok(TickOutcome::Merged(state.items.len() - before))
    }

    pub fn unread_count(&self) -> usize {
        self.state.lock().items.iter().filter(|n| !n.read).count()
    }

    pub fn items(&self) -> Vec<Notification> {
        self.state.lock().items.clone()
    }

    /// Flip everything read locally and tell the backend, fire and
    /// forget. A failed POST only means the badge reappears on a later
    /// poll.
    pub async fn mark_all_read(&self) {
        {
            let mut state = self.state.lock();
            for item in &mut state.items {
                item.read = true;
            }
        }
        if let Err(err) = self.gateway.read_all_notifications().await {
            warn!(error = %err, "readAllNoti failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::future::Future;
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use crate::error::ApiError;
    use crate::models::{Conversation, Draft, Message, User};

    #[derive(Default)]
    struct FakeGateway {
        pages: Mutex<HashMap<usize, Vec<Notification>>>,
        read_all_called: AtomicBool,
        fail_read_all: AtomicBool,
    }

    fn noti(id: &str, created_at: u64, read: bool) -> Notification {
        Notification {
            id: id.to_string(),
            text: format!("noti-{id}"),
            created_at,
            read,
        }
    }

    impl Gateway for FakeGateway {
        fn conversations(
            &self,
        ) -> impl Future<Output = Result<Vec<Conversation>, ApiError>> + Send {
            async { Ok(Vec::new()) }
        }

        fn messages(
            &self,
            _conversation_id: &str,
            _skip: usize,
        ) -> impl Future<Output = Result<Vec<Message>, ApiError>> + Send {
            async { Ok(Vec::new()) }
        }

        fn last_message(
            &self,
            _conversation_id: &str,
        ) -> impl Future<Output = Result<Option<Message>, ApiError>> + Send {
            async { Ok(None) }
        }

        fn members(
            &self,
            _conversation_id: &str,
        ) -> impl Future<Output = Result<Vec<User>, ApiError>> + Send {
            async { Ok(Vec::new()) }
        }

        fn send_message(
            &self,
            _conversation_id: &str,
            _draft: &Draft,
        ) -> impl Future<Output = Result<(), ApiError>> + Send {
            async { Ok(()) }
        }

        fn notifications(
            &self,
            skip: usize,
        ) -> impl Future<Output = Result<Vec<Notification>, ApiError>> + Send {
            let page = self.pages.lock().get(&skip).cloned().unwrap_or_default();
            async move { Ok(page) }
        }

        fn read_all_notifications(&self) -> impl Future<Output = Result<(), ApiError>> + Send {
            async {
                self.read_all_called.store(true, Ordering::SeqCst);
                if self.fail_read_all.load(Ordering::SeqCst) {
                    Err(ApiError::Status {
                        status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                        body: String::new(),
                    })
                } else {
                    Ok(())
                }
            }
        }
    }

    #[tokio::test]
    async fn test_poll_merges_and_counts_unread() {
        let gateway = Arc::new(FakeGateway::default());
        gateway
            .pages
            .lock()
            .insert(0, vec![noti("n1", 1, true), noti("n2", 2, false)]);

        let feed = NotificationFeed::new(gateway.clone());
        feed.poll_once().await.unwrap();
        assert_eq!(feed.unread_count(), 1);

        gateway
            .pages
            .lock()
            .insert(0, vec![noti("n2", 2, false), noti("n3", 3, false)]);
        let outcome = feed.poll_once().await.unwrap();
        assert_eq!(outcome, TickOutcome::Merged(1));
        assert_eq!(feed.unread_count(), 2);
    }

    #[tokio::test]
    async fn test_load_older_pages_backwards() {
        let gateway = Arc::new(FakeGateway::default());
        gateway.pages.lock().insert(0, vec![noti("n3", 3, false)]);
        gateway
            .pages
            .lock()
            .insert(1, vec![noti("n1", 1, true), noti("n2", 2, true)]);

        let feed = NotificationFeed::new(gateway);
        feed.poll_once().await.unwrap();
        feed.load_older().await.unwrap();

        let ids: Vec<String> = feed.items().iter().map(|n| n.id.clone()).collect();
        assert_eq!(ids, vec!["n1", "n2", "n3"]);
    }

    #[tokio::test]
    async fn test_mark_all_read_is_optimistic() {
        let gateway = Arc::new(FakeGateway::default());
        gateway
            .pages
            .lock()
            .insert(0, vec![noti("n1", 1, false), noti("n2", 2, false)]);

        let feed = NotificationFeed::new(gateway.clone());
        feed.poll_once().await.unwrap();
        assert_eq!(feed.unread_count(), 2);

        // Even when the POST fails, the local badge clears. Items
        // already held keep their flipped read flag under id dedup,
        // so only newly fetched items can arrive unread.
        gateway.fail_read_all.store(true, Ordering::SeqCst);
        feed.mark_all_read().await;
        assert_eq!(feed.unread_count(), 0);
        assert!(gateway.read_all_called.load(Ordering::SeqCst));
    }
}
