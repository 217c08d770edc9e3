use crate::error::WorkspaceResult;
use crate::save_coordinator::{
    lock_store, CoordinatorHandle, SaveConfig, SaveCoordinator, SaveOutcome, SharedStore,
};
use blockpage_editor::{LayoutMutation, LayoutStore, StoreEvent, StoreState, DEFAULT_HISTORY_LIMIT};
use blockpage_layout::LayoutDocument;
use blockpage_persistence::{Hydrator, PersistenceAdapter, Tier, TierAttempt};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub save: SaveConfig,
    pub history_limit: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            save: SaveConfig::default(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationResult {
    pub changed: bool,
    pub state: StoreState,
}

/// One page open in the editor: its store plus the coordinator saving it
pub struct EditorSession {
    page_key: String,
    store: SharedStore,
    saver: CoordinatorHandle,
    hydrated_from: Tier,
    attempts: Vec<TierAttempt>,
}

impl EditorSession {
    /// Hydrate a fresh store for `page_key` and start autosaving it to `adapter`
    pub async fn open(
        page_key: &str,
        hydrator: &Hydrator,
        adapter: Arc<dyn PersistenceAdapter>,
        config: &SessionConfig,
    ) -> WorkspaceResult<Self> {
        let hydration = hydrator.hydrate(page_key).await;

        let mut store = LayoutStore::with_history_limit(config.history_limit);
        store.hydrate(hydration.document)?;
        let store = Arc::new(Mutex::new(store));

        let (saver, _task) =
            SaveCoordinator::new(page_key, store.clone(), adapter, config.save.clone()).spawn()?;

        tracing::info!(
            "Opened editor session for {} (hydrated from {})",
            page_key,
            hydration.source
        );

        Ok(Self {
            page_key: page_key.to_string(),
            store,
            saver,
            hydrated_from: hydration.source,
            attempts: hydration.attempts,
        })
    }

    pub fn page_key(&self) -> &str {
        &self.page_key
    }

    pub fn hydrated_from(&self) -> Tier {
        self.hydrated_from
    }

    pub fn attempts(&self) -> &[TierAttempt] {
        &self.attempts
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    pub fn state(&self) -> WorkspaceResult<StoreState> {
        Ok(lock_store(&self.store)?.state())
    }

    pub fn document(&self, last_modified_by: &str) -> WorkspaceResult<LayoutDocument> {
        Ok(lock_store(&self.store)?.document(last_modified_by))
    }

    pub fn subscribe(&self) -> WorkspaceResult<broadcast::Receiver<StoreEvent>> {
        Ok(lock_store(&self.store)?.subscribe())
    }

    pub fn apply(&self, mutation: LayoutMutation) -> WorkspaceResult<MutationResult> {
        let name = mutation.name();
        let mut store = lock_store(&self.store)?;
        let changed = store.apply(mutation)?;

        tracing::debug!(
            "Applied {} to {} (changed: {}, revision {})",
            name,
            self.page_key,
            changed,
            store.revision()
        );

        Ok(MutationResult {
            changed,
            state: store.state(),
        })
    }

    pub async fn flush(&self) -> WorkspaceResult<SaveOutcome> {
        self.saver.flush().await
    }

    /// Final save, then stop autosaving
    pub async fn close(&self) -> WorkspaceResult<SaveOutcome> {
        self.saver.shutdown().await
    }
}
