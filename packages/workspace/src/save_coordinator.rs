//! Debounced autosave
//!
//! One coordinator task per editing session. It listens to the store's
//! change events and, once the layout has been quiet for the debounce
//! window, hands the current document to a persistence adapter.
//!
//! ```text
//! store event ──▶ dirty && !saving? ──▶ (re)arm timer
//!                                          │ quiet for `debounce`
//!                                          ▼
//!                 mark_saving ──▶ adapter.save ──▶ mark_saved | mark_save_failed
//! ```
//!
//! The store lock is never held across the adapter call, so edits made
//! while a write is in flight land normally and schedule the next save.

use crate::error::{WorkspaceError, WorkspaceResult};
use blockpage_editor::LayoutStore;
use blockpage_layout::{PersistenceEnvelope, PAGE_BUILDER};
use blockpage_persistence::PersistenceAdapter;
use serde::Serialize;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Sleep;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(2000);

pub type SharedStore = Arc<Mutex<LayoutStore>>;

pub fn lock_store(store: &SharedStore) -> WorkspaceResult<MutexGuard<'_, LayoutStore>> {
    store.lock().map_err(|_| WorkspaceError::StorePoisoned)
}

#[derive(Debug, Clone)]
pub struct SaveConfig {
    /// When off, only explicit flushes write
    pub enabled: bool,
    pub debounce: Duration,
    /// Recorded in the saved document's metadata
    pub last_modified_by: String,
}

impl Default for SaveConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce: DEFAULT_DEBOUNCE,
            last_modified_by: PAGE_BUILDER.to_string(),
        }
    }
}

/// What a save attempt did
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", content = "error", rename_all = "camelCase")]
pub enum SaveOutcome {
    Saved,
    /// Nothing unsaved
    Clean,
    /// Another write already holds the saving flag
    InProgress,
    Failed(String),
}

enum Command {
    Flush(oneshot::Sender<SaveOutcome>),
    Shutdown(oneshot::Sender<SaveOutcome>),
}

/// Control handle for a running coordinator
#[derive(Clone)]
pub struct CoordinatorHandle {
    page_key: String,
    commands: mpsc::UnboundedSender<Command>,
}

impl CoordinatorHandle {
    /// Cancel any pending timer and save right now
    pub async fn flush(&self) -> WorkspaceResult<SaveOutcome> {
        self.request(Command::Flush).await
    }

    /// Flush, then stop the coordinator task
    pub async fn shutdown(&self) -> WorkspaceResult<SaveOutcome> {
        self.request(Command::Shutdown).await
    }

    async fn request(
        &self,
        command: impl FnOnce(oneshot::Sender<SaveOutcome>) -> Command,
    ) -> WorkspaceResult<SaveOutcome> {
        let stopped = || WorkspaceError::CoordinatorStopped(self.page_key.clone());
        let (reply, response) = oneshot::channel();
        self.commands.send(command(reply)).map_err(|_| stopped())?;
        response.await.map_err(|_| stopped())
    }

    pub fn is_running(&self) -> bool {
        !self.commands.is_closed()
    }
}

pub struct SaveCoordinator {
    page_key: String,
    store: SharedStore,
    adapter: Arc<dyn PersistenceAdapter>,
    config: SaveConfig,
}

impl SaveCoordinator {
    pub fn new(
        page_key: impl Into<String>,
        store: SharedStore,
        adapter: Arc<dyn PersistenceAdapter>,
        config: SaveConfig,
    ) -> Self {
        Self {
            page_key: page_key.into(),
            store,
            adapter,
            config,
        }
    }

    /// Start the coordinator on the current runtime.
    ///
    /// Subscribes before spawning so no change made after this call is missed.
    pub fn spawn(self) -> WorkspaceResult<(CoordinatorHandle, JoinHandle<()>)> {
        let events = lock_store(&self.store)?.subscribe();
        let (commands, receiver) = mpsc::unbounded_channel();

        let handle = CoordinatorHandle {
            page_key: self.page_key.clone(),
            commands,
        };

        let task = tokio::spawn(self.run(events, receiver));
        Ok((handle, task))
    }

    async fn run(
        self,
        mut events: tokio::sync::broadcast::Receiver<blockpage_editor::StoreEvent>,
        mut commands: mpsc::UnboundedReceiver<Command>,
    ) {
        tracing::debug!(
            "Save coordinator started for {} (debounce {:?}, autosave {})",
            self.page_key,
            self.config.debounce,
            self.config.enabled
        );

        let mut timer: Option<Pin<Box<Sleep>>> = None;

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Ok(event) if event.change.is_structural() => self.schedule(&mut timer),
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("Save coordinator for {} lagged by {} events", self.page_key, skipped);
                        self.schedule(&mut timer);
                    }
                    Err(RecvError::Closed) => break,
                },
                _ = elapsed(&mut timer) => {
                    timer = None;
                    self.save_now().await;
                }
                command = commands.recv() => match command {
                    Some(Command::Flush(reply)) => {
                        timer = None;
                        let _ = reply.send(self.save_now().await);
                    }
                    Some(Command::Shutdown(reply)) => {
                        let _ = reply.send(self.save_now().await);
                        break;
                    }
                    None => break,
                },
            }
        }

        tracing::debug!("Save coordinator stopped for {}", self.page_key);
    }

    /// Restart the quiet-period timer if there is something to save
    fn schedule(&self, timer: &mut Option<Pin<Box<Sleep>>>) {
        if !self.config.enabled {
            return;
        }

        let pending = match lock_store(&self.store) {
            Ok(store) => store.is_dirty() && !store.is_saving(),
            Err(e) => {
                tracing::error!("{}", e);
                false
            }
        };

        if pending {
            *timer = Some(Box::pin(tokio::time::sleep(self.config.debounce)));
        }
    }

    /// One write attempt against the adapter
    pub async fn save_now(&self) -> SaveOutcome {
        let (envelope, revision) = {
            let mut store = match lock_store(&self.store) {
                Ok(store) => store,
                Err(e) => return SaveOutcome::Failed(e.to_string()),
            };
            if !store.is_dirty() {
                return SaveOutcome::Clean;
            }
            if store.is_saving() {
                return SaveOutcome::InProgress;
            }

            store.mark_saving(true);
            let document = store.document(&self.config.last_modified_by);
            (
                PersistenceEnvelope::new(self.page_key.clone(), document),
                store.revision(),
            )
        };

        let result = self.adapter.save(&envelope).await;

        let mut store = match lock_store(&self.store) {
            Ok(store) => store,
            Err(e) => return SaveOutcome::Failed(e.to_string()),
        };

        match result {
            Ok(()) => {
                // Edits made during the write stay unsaved
                if store.revision() == revision {
                    store.mark_saved();
                }
                store.mark_saving(false);
                tracing::info!(
                    "Saved {} ({} components) via {}",
                    self.page_key,
                    envelope.document.components.len(),
                    self.adapter.name()
                );
                SaveOutcome::Saved
            }
            Err(e) => {
                let message = e.to_string();
                tracing::error!(
                    "Save of {} via {} failed: {}",
                    self.page_key,
                    self.adapter.name(),
                    message
                );
                store.mark_save_failed(message.clone());
                SaveOutcome::Failed(message)
            }
        }
    }
}

async fn elapsed(timer: &mut Option<Pin<Box<Sleep>>>) {
    match timer {
        Some(sleep) => sleep.as_mut().await,
        None => std::future::pending().await,
    }
}
