//! # Layout Store
//!
//! Single source of truth for one page's layout during an editing session.
//!
//! ## Lifecycle
//!
//! ```text
//! hydrate ──▶ add / remove / reorder / undo / redo ──▶ mark_saving ──▶ mark_saved
//!   │                 │                                      │
//! history reset   history push, dirty                 status only
//! ```
//!
//! All operations are synchronous. After each state transition the store
//! publishes a [`StoreEvent`] so observers never need to poll.

use crate::events::{ChangeKind, StoreEvent};
use crate::mutations::{LayoutMutation, MutationError};
use crate::undo_stack::{Snapshot, UndoStack, DEFAULT_HISTORY_LIMIT};
use crate::EditorError;
use blockpage_layout::{Component, LayoutDocument, LayoutMetadata, LAYOUT_VERSION};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

const EVENT_CAPACITY: usize = 256;

/// Save indicator shown next to the undo/redo buttons
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "at", rename_all = "camelCase")]
pub enum SaveStatus {
    Saving,
    Unsaved,
    Saved(DateTime<Utc>),
    Clean,
}

/// Serializable view of the store for clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreState {
    pub components: Vec<Component>,
    pub is_dirty: bool,
    pub is_saving: bool,
    pub last_saved: Option<DateTime<Utc>>,
    pub last_save_error: Option<String>,
    pub can_undo: bool,
    pub can_redo: bool,
    pub revision: u64,
    pub status: SaveStatus,
}

#[derive(Debug)]
pub struct LayoutStore {
    components: Snapshot,
    history: UndoStack,
    is_dirty: bool,
    is_saving: bool,
    last_saved: Option<DateTime<Utc>>,
    last_save_error: Option<String>,
    updated_at: DateTime<Utc>,

    /// Increments on every structural change
    revision: u64,

    events: broadcast::Sender<StoreEvent>,
}

impl LayoutStore {
    /// Empty store with the default history limit (50)
    pub fn new() -> Self {
        Self::with_history_limit(DEFAULT_HISTORY_LIMIT)
    }

    pub fn with_history_limit(limit: usize) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            components: Vec::new(),
            history: UndoStack::with_max_levels(limit),
            is_dirty: false,
            is_saving: false,
            last_saved: None,
            last_save_error: None,
            updated_at: Utc::now(),
            revision: 0,
            events,
        }
    }

    /// Receive a notification after every state transition
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    pub fn is_saving(&self) -> bool {
        self.is_saving
    }

    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.last_saved
    }

    pub fn last_save_error(&self) -> Option<&str> {
        self.last_save_error.as_deref()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn history(&self) -> &UndoStack {
        &self.history
    }

    pub fn save_status(&self) -> SaveStatus {
        if self.is_saving {
            SaveStatus::Saving
        } else if self.is_dirty {
            SaveStatus::Unsaved
        } else if let Some(at) = self.last_saved {
            SaveStatus::Saved(at)
        } else {
            SaveStatus::Clean
        }
    }

    pub fn state(&self) -> StoreState {
        StoreState {
            components: self.components.clone(),
            is_dirty: self.is_dirty,
            is_saving: self.is_saving,
            last_saved: self.last_saved,
            last_save_error: self.last_save_error.clone(),
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
            revision: self.revision,
            status: self.save_status(),
        }
    }

    /// Current layout as a document, with metadata recomputed from the live list
    pub fn document(&self, last_modified_by: &str) -> LayoutDocument {
        LayoutDocument {
            components: self.components.clone(),
            updated_at: self.updated_at,
            version: LAYOUT_VERSION.to_string(),
            metadata: Some(LayoutMetadata::from_components(
                &self.components,
                last_modified_by,
            )),
        }
    }

    /// Validate a stored document and load it as the session's starting point
    pub fn hydrate(&mut self, document: LayoutDocument) -> Result<(), EditorError> {
        document.validate()?;
        self.updated_at = document.updated_at;
        self.set_components(document.components);
        Ok(())
    }

    /// Replace the list wholesale. History restarts from this list and the
    /// dirty flag is cleared; the saving flag is left alone.
    ///
    /// Incoming lists are ordered by their `order` field and re-ranked so the
    /// dense-order invariant holds even for hand-edited storage.
    pub fn set_components(&mut self, mut components: Vec<Component>) {
        components.sort_by_key(|component| component.order);
        rerank(&mut components);

        self.components = components;
        self.history.clear();
        self.is_dirty = false;
        self.commit(ChangeKind::Set);
    }

    /// Append a component at the end of the page
    pub fn add_component(&mut self, mut component: Component) -> Result<(), MutationError> {
        if self.components.iter().any(|c| c.id == component.id) {
            return Err(MutationError::DuplicateId(component.id));
        }

        component.order = self.components.len();
        let id = component.id.clone();

        self.record();
        self.components.push(component);
        self.is_dirty = true;
        self.commit(ChangeKind::Add { id });
        Ok(())
    }

    /// Remove by id. Returns `false` (and changes nothing) if the id is absent.
    pub fn remove_component(&mut self, id: &str) -> bool {
        let Some(position) = self.components.iter().position(|c| c.id == id) else {
            return false;
        };

        self.record();
        self.components.remove(position);
        rerank(&mut self.components);
        self.is_dirty = true;
        self.commit(ChangeKind::Remove { id: id.to_string() });
        true
    }

    /// Move the component at `source_index` to `destination_index`.
    ///
    /// Equal indices still count as a structural change: history is pushed,
    /// the redo future is dropped and the store is marked dirty.
    pub fn reorder_components(
        &mut self,
        source_index: usize,
        destination_index: usize,
    ) -> Result<bool, MutationError> {
        let len = self.components.len();
        for index in [source_index, destination_index] {
            if index >= len {
                return Err(MutationError::IndexOutOfRange { index, len });
            }
        }

        self.record();
        let moved = self.components.remove(source_index);
        self.components.insert(destination_index, moved);
        rerank(&mut self.components);
        self.is_dirty = true;
        self.commit(ChangeKind::Reorder {
            source_index,
            destination_index,
        });
        Ok(true)
    }

    /// Step back one snapshot. Reverting is itself a change that needs saving.
    pub fn undo(&mut self) -> bool {
        if !self.history.undo(&mut self.components) {
            return false;
        }
        self.is_dirty = true;
        self.commit(ChangeKind::Undo);
        true
    }

    pub fn redo(&mut self) -> bool {
        if !self.history.redo(&mut self.components) {
            return false;
        }
        self.is_dirty = true;
        self.commit(ChangeKind::Redo);
        true
    }

    /// Dispatch a wire-level mutation. Returns whether the layout changed.
    pub fn apply(&mut self, mutation: LayoutMutation) -> Result<bool, MutationError> {
        debug!(mutation = mutation.name(), "applying layout mutation");

        match mutation {
            LayoutMutation::SetComponents { components } => {
                self.set_components(components);
                Ok(true)
            }
            LayoutMutation::AddComponent { component } => {
                self.add_component(component)?;
                Ok(true)
            }
            LayoutMutation::RemoveComponent { id } => Ok(self.remove_component(&id)),
            LayoutMutation::ReorderComponents {
                source_index,
                destination_index,
            } => self.reorder_components(source_index, destination_index),
            LayoutMutation::Undo => Ok(self.undo()),
            LayoutMutation::Redo => Ok(self.redo()),
        }
    }

    pub fn mark_saving(&mut self, saving: bool) {
        self.is_saving = saving;
        self.publish(ChangeKind::Saving { saving });
    }

    /// Clears the dirty flag and stamps the save time
    pub fn mark_saved(&mut self) {
        self.is_dirty = false;
        self.last_saved = Some(Utc::now());
        self.last_save_error = None;
        self.publish(ChangeKind::Saved);
    }

    /// Record a failed write. Dirty stays set so the indicator keeps
    /// showing unsaved changes.
    pub fn mark_save_failed(&mut self, error: impl Into<String>) {
        let error = error.into();
        self.is_saving = false;
        self.last_save_error = Some(error.clone());
        self.publish(ChangeKind::SaveFailed { error });
    }

    fn record(&mut self) {
        self.history.record(self.components.clone());
    }

    fn commit(&mut self, change: ChangeKind) {
        self.revision += 1;
        self.updated_at = Utc::now();
        self.publish(change);
    }

    fn publish(&self, change: ChangeKind) {
        // No receivers is fine; the store works without observers
        let _ = self.events.send(StoreEvent {
            change,
            revision: self.revision,
        });
    }
}

impl Default for LayoutStore {
    fn default() -> Self {
        Self::new()
    }
}

fn rerank(components: &mut [Component]) {
    for (index, component) in components.iter_mut().enumerate() {
        component.order = index;
    }
}
