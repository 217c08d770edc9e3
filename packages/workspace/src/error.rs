use blockpage_editor::{EditorError, MutationError};
use blockpage_persistence::PersistenceError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error("Editor error: {0}")]
    Editor(#[from] EditorError),

    #[error("Mutation rejected: {0}")]
    Mutation(#[from] MutationError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Layout store lock poisoned")]
    StorePoisoned,

    #[error("Save coordinator for {0} has stopped")]
    CoordinatorStopped(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type WorkspaceResult<T> = Result<T, WorkspaceError>;
