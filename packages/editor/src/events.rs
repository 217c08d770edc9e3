//! Change notifications emitted by the layout store.
//!
//! Subscribers (the save coordinator, UI bridges) receive one event per
//! state transition over a `tokio::sync::broadcast` channel.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ChangeKind {
    Set,
    Add { id: String },
    Remove { id: String },
    #[serde(rename_all = "camelCase")]
    Reorder { source_index: usize, destination_index: usize },
    Undo,
    Redo,
    Saving { saving: bool },
    Saved,
    SaveFailed { error: String },
}

impl ChangeKind {
    /// Whether the change altered the component list (and history)
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ChangeKind::Set
                | ChangeKind::Add { .. }
                | ChangeKind::Remove { .. }
                | ChangeKind::Reorder { .. }
                | ChangeKind::Undo
                | ChangeKind::Redo
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreEvent {
    pub change: ChangeKind,

    /// Store revision after the change
    pub revision: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_changes_are_not_structural() {
        assert!(ChangeKind::Undo.is_structural());
        assert!(ChangeKind::Add { id: "a".into() }.is_structural());
        assert!(!ChangeKind::Saved.is_structural());
        assert!(!ChangeKind::Saving { saving: true }.is_structural());
        assert!(!ChangeKind::SaveFailed { error: "x".into() }.is_structural());
    }
}
