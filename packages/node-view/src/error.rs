//! Error types for node views
//!
//! Configuration errors (`NotANode`, `NoContentSlot`, `MissingComponent`)
//! point at a misconfigured extension and are never retried.

use portico_dom::DomError;
use portico_editor::EditorError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NodeViewError {
    #[error("You are attempting to use a node view for a mark type. Please check your configuration.")]
    NotANode,

    #[error("Invalid DOM spec: {0}")]
    InvalidDomSpec(String),

    #[error("A ref was applied to a node view provided by '{extension}' which doesn't support content")]
    NoContentSlot { extension: String },

    #[error("The extension '{extension}' used to create this node view doesn't have a component")]
    MissingComponent { extension: String },

    #[error("Invalid component options: {0}")]
    InvalidOptions(String),

    #[error("DOM error: {0}")]
    Dom(#[from] DomError),

    #[error("Editor error: {0}")]
    Editor(#[from] EditorError),
}

impl From<NodeViewError> for EditorError {
    fn from(e: NodeViewError) -> Self {
        match e {
            NodeViewError::Editor(inner) => inner,
            other => EditorError::NodeView(other.to_string()),
        }
    }
}
