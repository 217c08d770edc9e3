//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Invalid layout: {0}")]
    Layout(#[from] blockpage_layout::LayoutError),
}
