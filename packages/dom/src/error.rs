//! Error types for the DOM

use crate::NodeId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("Node is not an element: {0}")]
    NotAnElement(NodeId),

    #[error("Node is not a text or comment node: {0}")]
    NotText(NodeId),

    #[error("Cannot insert {child} into {parent}: the new child is an ancestor of the parent")]
    HierarchyRequest { parent: NodeId, child: NodeId },
}
