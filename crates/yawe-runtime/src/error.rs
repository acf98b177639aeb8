#![forbid(unsafe_code)]

use yawe_text::LayoutError;

use crate::config::ConfigError;

/// Errors surfaced to the host by [`EditorState`](crate::EditorState).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditorError {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, EditorError>;
