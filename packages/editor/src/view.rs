//! # Editor View
//!
//! The DOM-owning half of the editor. Node views receive an
//! `Rc<dyn EditorView>` and use it to read state, check editability and
//! dispatch transactions.

use crate::{EditorError, EditorState, Transaction};
use portico_dom::{Dom, NodeId};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use tracing::{debug, trace};

pub trait EditorView {
    /// Current state snapshot
    fn state(&self) -> EditorState;

    /// Apply a transaction and make it the current state
    fn dispatch(&self, tr: Transaction) -> Result<(), EditorError>;

    fn editable(&self) -> bool;

    /// Host DOM tree the view renders into
    fn document(&self) -> &Dom;

    /// Root element of the editable area
    fn dom(&self) -> NodeId;

    /// DOM node rendered for the document node at `pos`
    fn node_dom(&self, pos: usize) -> Option<NodeId>;
}

/// In-memory editor view without a reconciliation pass of its own.
///
/// Keeps every dispatched transaction so callers can inspect what a node
/// view sent.
#[derive(Debug)]
pub struct MemoryView {
    dom: Dom,
    root: NodeId,
    state: RefCell<EditorState>,
    editable: Cell<bool>,
    dispatched: RefCell<Vec<Transaction>>,
    node_doms: RefCell<BTreeMap<usize, NodeId>>,
}

impl MemoryView {
    pub fn new(dom: Dom, state: EditorState) -> Result<Self, EditorError> {
        let root = dom.create_element("div");
        dom.set_attribute(root, "class", "ProseMirror")?;
        dom.set_attribute(root, "contenteditable", "true")?;

        Ok(Self {
            dom,
            root,
            state: RefCell::new(state),
            editable: Cell::new(true),
            dispatched: RefCell::new(Vec::new()),
            node_doms: RefCell::new(BTreeMap::new()),
        })
    }

    pub fn set_editable(&self, editable: bool) -> Result<(), EditorError> {
        self.editable.set(editable);
        self.dom
            .set_attribute(self.root, "contenteditable", editable.to_string())?;
        Ok(())
    }

    /// Record which DOM node renders the document node at `pos`
    pub fn register_node_dom(&self, pos: usize, node: NodeId) {
        self.node_doms.borrow_mut().insert(pos, node);
    }

    pub fn dispatched(&self) -> Vec<Transaction> {
        self.dispatched.borrow().clone()
    }
}

impl EditorView for MemoryView {
    fn state(&self) -> EditorState {
        self.state.borrow().clone()
    }

    fn dispatch(&self, tr: Transaction) -> Result<(), EditorError> {
        let next = self.state.borrow().apply(&tr)?;
        debug!(version = next.version, "Dispatched transaction");
        *self.state.borrow_mut() = next;
        self.dispatched.borrow_mut().push(tr);
        Ok(())
    }

    fn editable(&self) -> bool {
        self.editable.get()
    }

    fn document(&self) -> &Dom {
        &self.dom
    }

    fn dom(&self) -> NodeId {
        self.root
    }

    fn node_dom(&self, pos: usize) -> Option<NodeId> {
        let node = self.node_doms.borrow().get(&pos).copied();
        trace!(pos, ?node, "node_dom lookup");
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Attrs, NodeSpec, NodeType};
    use serde_json::json;

    fn view() -> MemoryView {
        let doc_type = NodeType::new("doc", NodeSpec::with_content("block+"));
        let embed = NodeType::new("embed", NodeSpec::leaf());
        let doc = doc_type.create(Attrs::new(), vec![embed.create(Attrs::new(), vec![])]);
        MemoryView::new(Dom::new(), EditorState::new(doc)).unwrap()
    }

    #[test]
    fn test_dispatch_advances_state() {
        let view = view();
        let tr = view
            .state()
            .tr()
            .set_node_markup(0, None, json!({"id": "x"}).as_object().cloned().unwrap())
            .unwrap();

        view.dispatch(tr).unwrap();

        let state = view.state();
        assert_eq!(state.version, 1);
        assert_eq!(state.doc().content()[0].attr("id"), Some(&json!("x")));
        assert_eq!(view.dispatched().len(), 1);
    }

    #[test]
    fn test_set_editable_updates_root() {
        let view = view();
        view.set_editable(false).unwrap();

        assert!(!view.editable());
        assert_eq!(
            view.document().get_attribute(view.dom(), "contenteditable").as_deref(),
            Some("false")
        );
    }
}
