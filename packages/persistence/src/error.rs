use blockpage_layout::LayoutError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GraphQL error: {0}")]
    Graphql(String),

    #[error("Invalid layout: {0}")]
    InvalidLayout(#[from] LayoutError),

    #[error("{0} backend is not configured")]
    NotConfigured(&'static str),

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Write rejected: {0}")]
    Rejected(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;
