//! Error types for the editor

use pagecraft_compiler_html::RenderError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("No editable field '{path}' on node {node_id}")]
    UnknownField { node_id: String, path: String },

    #[error("No edit in progress for '{path}' on node {node_id}")]
    NoDraft { node_id: String, path: String },

    #[error("Invalid value for '{path}': {message}")]
    Validation { path: String, message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
