//! # Portico Editor
//!
//! The editing-engine side of Portico: the immutable content tree, the
//! transactions that change it, and the contract the engine uses to hand
//! rendering of a node over to a node view.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ schema: NodeType + NodeSpec (to_dom)        │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ node / state / transaction                  │
//! │  - Immutable ContentNode tree               │
//! │  - SetNodeMarkup steps                      │
//! │  - EditorState versions                     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ view + node_view: DOM-owning contract       │
//! │  - EditorView (state, dispatch, editable)   │
//! │  - NodeView lifecycle + factory             │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Content tree is source of truth**: the DOM is a derived view
//! 2. **Identity over equality**: unchanged nodes keep their `Rc`, so
//!    node views can skip work with a pointer comparison
//! 3. **Node views own their DOM**: the engine only keeps the root element
//!
//! ## Usage
//!
//! ```rust,ignore
//! use portico_editor::{EditorState, EditorView, MemoryView};
//!
//! let view = MemoryView::new(dom, EditorState::new(doc))?;
//! let tr = view.state().tr().set_node_markup(pos, None, attrs)?;
//! view.dispatch(tr)?;
//! ```

mod decoration;
mod errors;
mod node;
mod node_view;
mod schema;
mod state;
mod transaction;
mod view;

pub use decoration::{Decoration, DecorationSet};
pub use errors::EditorError;
pub use node::{Attrs, ContentNode};
pub use node_view::{
    observed_mutations, GetPosition, NodeView, NodeViewFactory, PositionLookup,
    SELECTED_NODE_CLASS_NAME,
};
pub use schema::{DomOutputSpec, NodeSpec, NodeType, ToDom};
pub use state::EditorState;
pub use transaction::{Step, Transaction};
pub use view::{EditorView, MemoryView};

// Re-export DOM types for convenience
pub use portico_dom::{Dom, MutationKind, MutationRecord, NodeId};
