//! # Node View Contract
//!
//! For node types that opt out of default rendering, the engine calls a
//! [`NodeViewFactory`] and then drives the returned [`NodeView`] during its
//! reconciliation pass:
//!
//! ```text
//! factory(node, view, position) → NodeView
//!        ↓
//! update(node, decorations) ── false ──→ destroy + factory again
//!        ↓ true
//! select_node / deselect_node
//!        ↓
//! ignore_mutation(record) for each observed DOM mutation
//!        ↓
//! destroy
//! ```

use crate::{ContentNode, DecorationSet, EditorError, EditorView};
use portico_dom::{MutationRecord, NodeId};
use std::fmt;
use std::rc::Rc;

/// Class the engine expects on the DOM of a selected node
pub const SELECTED_NODE_CLASS_NAME: &str = "ProseMirror-selectednode";

pub type GetPosition = Rc<dyn Fn() -> usize>;

/// Third argument of a node view factory.
///
/// Nodes get a function returning their current position. Marks only get a
/// flag telling whether they are inline, which is how a node view that was
/// registered for a mark by mistake can tell.
#[derive(Clone)]
pub enum PositionLookup {
    Node(GetPosition),
    Mark { inline: bool },
}

impl PositionLookup {
    pub fn node(get_position: impl Fn() -> usize + 'static) -> Self {
        PositionLookup::Node(Rc::new(get_position))
    }

    /// Fixed position, for nodes that never move
    pub fn at(pos: usize) -> Self {
        Self::node(move || pos)
    }

    pub fn as_node(&self) -> Option<&GetPosition> {
        match self {
            PositionLookup::Node(get_position) => Some(get_position),
            PositionLookup::Mark { .. } => None,
        }
    }
}

impl fmt::Debug for PositionLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionLookup::Node(get_position) => write!(f, "Node(pos = {})", get_position()),
            PositionLookup::Mark { inline } => f.debug_struct("Mark").field("inline", inline).finish(),
        }
    }
}

pub trait NodeView {
    /// Outer DOM node; must stay the same element for the view's lifetime
    fn dom(&self) -> NodeId;

    /// Where the engine renders the node's children, if anywhere
    fn content_dom(&self) -> Option<NodeId> {
        None
    }

    /// Return `false` when the view cannot represent `node`; the engine then
    /// destroys it and creates a new one.
    fn update(&mut self, node: &ContentNode, decorations: &DecorationSet)
        -> Result<bool, EditorError>;

    fn select_node(&mut self) -> Result<(), EditorError>;

    fn deselect_node(&mut self) -> Result<(), EditorError>;

    /// Return `true` for mutations the engine must not read back as edits
    fn ignore_mutation(&self, mutation: &MutationRecord) -> bool;

    fn destroy(&mut self);
}

pub type NodeViewFactory =
    Rc<dyn Fn(ContentNode, Rc<dyn EditorView>, PositionLookup) -> Result<Box<dyn NodeView>, EditorError>>;

/// Mutations inside `view` that the engine should treat as document edits
pub fn observed_mutations(
    view: &dyn NodeView,
    records: impl IntoIterator<Item = MutationRecord>,
) -> Vec<MutationRecord> {
    records
        .into_iter()
        .filter(|record| !view.ignore_mutation(record))
        .collect()
}
