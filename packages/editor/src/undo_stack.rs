//! # Undo/Redo Stack
//!
//! Snapshot history for the layout store.
//!
//! ## Design
//!
//! - Before a structural mutation the store records the full component list
//! - Undo swaps the present list with the newest snapshot, pushing the
//!   present onto the redo stack
//! - Redo is the mirror image
//! - Recording a new snapshot clears the redo stack
//! - The undo stack is bounded; the oldest snapshot is evicted first
//!
//! Lists are small (a handful of blocks per page), so full copies are cheaper
//! to reason about than inverse operations.
//!
//! ## Example
//!
//! ```rust,ignore
//! let mut stack = UndoStack::new();
//! let mut present = vec![hero.clone()];
//!
//! stack.record(present.clone());
//! present.push(grid.clone());
//!
//! assert!(stack.undo(&mut present));
//! assert_eq!(present, vec![hero]);
//! ```

use blockpage_layout::Component;
use std::collections::VecDeque;

/// Number of snapshots kept when no limit is configured
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// One recorded component list
pub type Snapshot = Vec<Component>;

/// Undo/redo stack of component-list snapshots
#[derive(Debug, Clone)]
pub struct UndoStack {
    /// Previous states (oldest first)
    undo_stack: VecDeque<Snapshot>,

    /// Undone states (most recent last)
    redo_stack: Vec<Snapshot>,

    /// Maximum number of undo levels (0 = unlimited)
    max_levels: usize,
}

impl UndoStack {
    /// Create a new undo stack with the default limit (50)
    pub fn new() -> Self {
        Self::with_max_levels(DEFAULT_HISTORY_LIMIT)
    }

    /// Create an undo stack with custom max levels
    pub fn with_max_levels(max_levels: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_levels,
        }
    }

    /// Record the state that is about to be replaced
    pub fn record(&mut self, before: Snapshot) {
        self.undo_stack.push_back(before);

        if self.max_levels > 0 {
            while self.undo_stack.len() > self.max_levels {
                self.undo_stack.pop_front();
            }
        }

        // New action invalidates future
        self.redo_stack.clear();
    }

    /// Step back one snapshot, swapping it into `present`
    pub fn undo(&mut self, present: &mut Snapshot) -> bool {
        match self.undo_stack.pop_back() {
            Some(previous) => {
                let current = std::mem::replace(present, previous);
                self.redo_stack.push(current);
                true
            }
            None => false,
        }
    }

    /// Step forward one snapshot, swapping it into `present`
    pub fn redo(&mut self, present: &mut Snapshot) -> bool {
        match self.redo_stack.pop() {
            Some(next) => {
                let current = std::mem::replace(present, next);
                self.undo_stack.push_back(current);
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of undo levels available
    pub fn undo_levels(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of redo levels available
    pub fn redo_levels(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn max_levels(&self) -> usize {
        self.max_levels
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for UndoStack {
    fn default() -> Self {
        Self::new()
    }
}
