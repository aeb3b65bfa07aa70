use pagecraft_compiler_html::RenderError;
use pagecraft_editor::EditorError;
use thiserror::Error;

/// Failures of a persistence backend
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Page not found: {0}")]
    NotFound(String),

    #[error("Invalid page id: {0}")]
    InvalidId(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("No file uploaded")]
    Empty,

    #[error("File type not allowed: {0}")]
    ContentTypeNotAllowed(String),

    #[error("File too large: {size} bytes (limit {limit})")]
    TooLarge { size: u64, limit: u64 },

    #[error("Invalid asset name: {0}")]
    InvalidName(String),

    #[error("Asset not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Editor error: {0}")]
    Editor(#[from] EditorError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Registry has no root component type")]
    MissingRootType,
}

impl From<pagecraft_editor::MutationError> for WorkspaceError {
    fn from(e: pagecraft_editor::MutationError) -> Self {
        WorkspaceError::Editor(EditorError::Mutation(e))
    }
}
