//! Error types for the editor

use portico_dom::DomError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error("No node at position {0}")]
    NoNodeAt(usize),

    #[error("DOM error: {0}")]
    Dom(#[from] DomError),

    #[error("Node view error: {0}")]
    NodeView(String),
}
