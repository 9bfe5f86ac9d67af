//! # Portico DOM
//!
//! A small, single-threaded DOM used as the host tree for editor node views.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ Dom: shared arena of elements / text nodes  │
//! │  - attributes + class list                  │
//! │  - parent/child links, subtree containment  │
//! │  - mutation journal (observer records)      │
//! └─────────────────────────────────────────────┘
//!                     ↑
//! ┌─────────────────────────────────────────────┐
//! │ VNode: declarative description of a subtree │
//! │  mounted into the Dom by a renderer         │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Node identity is a [`NodeId`]. An id keeps pointing at the same node,
//! attached or not, until that node is freed with
//! [`Dom::remove_subtree`]. Freed slots are reused under a new generation,
//! so a stale id never aliases a newer node.

mod error;
mod mutation;
mod tree;
mod vnode;

pub use error::DomError;
pub use mutation::{MutationKind, MutationRecord};
pub use tree::{Dom, NodeId, NodeKind};
pub use vnode::{MountedVNode, VNode};
