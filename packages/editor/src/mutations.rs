//! # Layout Mutations
//!
//! The vocabulary the editor surface speaks to the store. Each variant maps
//! to one store operation; `LayoutStore::apply` dispatches them.
//!
//! ## Semantics
//!
//! ### AddComponent
//! - Appends; the incoming `order` is ignored and replaced by the list length
//! - Rejects ids already present on the page
//!
//! ### RemoveComponent
//! - Absent ids are a no-op, so deleting twice is safe
//!
//! ### ReorderComponents
//! - Both indices must address an existing component
//! - Orders are re-derived from array position afterwards

use blockpage_layout::Component;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LayoutMutation {
    /// Replace the whole list (hydration)
    SetComponents { components: Vec<Component> },

    AddComponent { component: Component },

    RemoveComponent { id: String },

    #[serde(rename_all = "camelCase")]
    ReorderComponents {
        source_index: usize,
        destination_index: usize,
    },

    Undo,

    Redo,
}

impl LayoutMutation {
    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            LayoutMutation::SetComponents { .. } => "setComponents",
            LayoutMutation::AddComponent { .. } => "addComponent",
            LayoutMutation::RemoveComponent { .. } => "removeComponent",
            LayoutMutation::ReorderComponents { .. } => "reorderComponents",
            LayoutMutation::Undo => "undo",
            LayoutMutation::Redo => "redo",
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("Component already on page: {0}")]
    DuplicateId(String),

    #[error("Index {index} out of range for {len} components")]
    IndexOutOfRange { index: usize, len: usize },
}
