//! # Blockpage Workspace
//!
//! Runs editing sessions: each open page gets a [`LayoutStore`] behind a
//! mutex and a [`SaveCoordinator`] task that autosaves it. The same state
//! backs the HTTP API in [`server`].
//!
//! [`LayoutStore`]: blockpage_editor::LayoutStore

pub mod error;
pub mod save_coordinator;
pub mod server;
pub mod session;
pub mod state;

pub use error::{WorkspaceError, WorkspaceResult};
pub use save_coordinator::{
    lock_store, CoordinatorHandle, SaveConfig, SaveCoordinator, SaveOutcome, SharedStore,
    DEFAULT_DEBOUNCE,
};
pub use server::WorkspaceServer;
pub use session::{EditorSession, MutationResult, SessionConfig};
pub use state::WorkspaceState;
