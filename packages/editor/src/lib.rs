//! # Blockpage Editor
//!
//! Layout-state engine for the Blockpage page builder.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ layout: Component / LayoutDocument types    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: LayoutStore                         │
//! │  - Hydrate from a stored document           │
//! │  - Add / remove / reorder components        │
//! │  - Snapshot undo/redo (bounded)             │
//! │  - Dirty / saving flags                     │
//! │  - Broadcast change notifications           │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ workspace: save coordinator → persistence   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Dense ordering**: every component's `order` equals its index after
//!    each structural change
//! 2. **Exact undo**: history stores full snapshots, so undo/redo restore
//!    lists bit-for-bit
//! 3. **Never blocked on I/O**: the store is synchronous; persistence happens
//!    elsewhere and reports back through status transitions
//!
//! ## Usage
//!
//! ```rust,ignore
//! use blockpage_editor::{LayoutMutation, LayoutStore};
//! use blockpage_layout::{Component, ComponentType};
//!
//! let mut store = LayoutStore::new();
//! store.hydrate(document)?;
//!
//! store.apply(LayoutMutation::AddComponent {
//!     component: Component::placeholder(ComponentType::Hero),
//! })?;
//! store.apply(LayoutMutation::ReorderComponents {
//!     source_index: 0,
//!     destination_index: 1,
//! })?;
//! store.undo();
//! ```

mod errors;
mod events;
mod mutations;
mod store;
mod undo_stack;

pub use errors::EditorError;
pub use events::{ChangeKind, StoreEvent};
pub use mutations::{LayoutMutation, MutationError};
pub use store::{LayoutStore, SaveStatus, StoreState};
pub use undo_stack::{Snapshot, UndoStack, DEFAULT_HISTORY_LIMIT};

// Re-export layout types for convenience
pub use blockpage_layout::{Component, ComponentType, LayoutDocument};
