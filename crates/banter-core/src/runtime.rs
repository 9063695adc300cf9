//! Wires the four synchronization streams over one shared gateway.
//!
//! Each `Messenger` owns its components outright; nothing here is a
//! process-wide singleton, so two instances polling different
//! backends cannot observe each other's state.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::api::Gateway;
use crate::config::SyncConfig;
use crate::error::{SendError, SyncError};
use crate::models::Draft;
use crate::sync::{
    ConversationDirectory, MessageWindow, NotificationFeed, PreviewCache, SyncScheduler,
};

pub struct Messenger<G> {
    pub directory: Arc<ConversationDirectory<G>>,
    pub window: Arc<MessageWindow<G>>,
    pub previews: Arc<PreviewCache<G>>,
    pub notifications: Arc<NotificationFeed<G>>,
    config: SyncConfig,
    scheduler: Mutex<SyncScheduler>,
}

impl<G: Gateway> Messenger<G> {
    pub fn new(gateway: Arc<G>, me: impl Into<String>, config: SyncConfig) -> Self {
        Self {
            directory: Arc::new(ConversationDirectory::new(gateway.clone())),
            window: Arc::new(MessageWindow::new(gateway.clone(), me)),
            previews: Arc::new(PreviewCache::new(gateway.clone())),
            notifications: Arc::new(NotificationFeed::new(gateway)),
            config,
            scheduler: Mutex::new(SyncScheduler::new()),
        }
    }

    /// Spawn the four polling streams. Idempotent; calling twice does
    /// not double the timers.
    pub fn start(&self) {
        let mut scheduler = self.scheduler.lock();
        if scheduler.is_running() {
            return;
        }

        let directory = self.directory.clone();
        let window = self.window.clone();
        scheduler.spawn_stream(
            "conversations",
            self.config.conversation_list_period,
            move || {
                let directory = directory.clone();
                let window = window.clone();
                async move {
                    let outcome = directory.refresh().await?;
                    // First refresh auto-selects a conversation; open
                    // the window for it if nothing is open yet.
                    if window.snapshot().conversation_id.is_none() {
                        if let Some(selected) = directory.selected() {
                            window.open(selected).await?;
                        }
                    }
                    Ok(outcome)
                }
            },
        );

        let window = self.window.clone();
        scheduler.spawn_stream("window", self.config.window_poll_period, move || {
            let window = window.clone();
            async move { window.poll_once().await }
        });

        let directory = self.directory.clone();
        let previews = self.previews.clone();
        scheduler.spawn_stream("previews", self.config.preview_period, move || {
            let directory = directory.clone();
            let previews = previews.clone();
            async move {
                let ids: Vec<String> = directory
                    .conversations()
                    .iter()
                    .map(|c| c.id.clone())
                    .collect();
                previews.retain(&ids);
                previews.refresh_all(&ids).await
            }
        });

        let notifications = self.notifications.clone();
        scheduler.spawn_stream(
            "notifications",
            self.config.notification_period,
            move || {
                let notifications = notifications.clone();
                async move { notifications.poll_once().await }
            },
        );
    }

    /// Switch the active conversation, re-opening the window when the
    /// selection actually changed.
    pub async fn select_conversation(&self, id: impl Into<String>) -> Result<(), SyncError> {
        let id = id.into();
        let changed = self.directory.select(id.clone());
        let window_matches = self.window.snapshot().conversation_id.as_deref() == Some(id.as_str());
        if changed || !window_matches {
            self.window.open(id).await?;
        }
        Ok(())
    }

    pub async fn send(&self, draft: Draft) -> Result<(), SendError> {
        self.window.send(draft).await
    }

    /// Stop all timers and orphan any in-flight responses.
    pub fn shutdown(&self) {
        self.scheduler.lock().shutdown();
        self.window.close();
    }
}
