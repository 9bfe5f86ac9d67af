//! # DOM Tree
//!
//! Arena-backed element tree shared between the editing engine, node views
//! and the portal renderer.
//!
//! [`Dom`] is a cheap handle (`Rc<RefCell<..>>`); every method borrows the
//! arena only for the duration of the call, so callers can freely interleave
//! reads and writes from callbacks.

use crate::{DomError, MutationRecord};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use tracing::{trace, warn};

/// Identity of a DOM node.
///
/// Freed slots are reused with a bumped generation, so an id that outlives
/// its node resolves to [`DomError::NodeNotFound`] rather than to whatever
/// node took the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

impl NodeId {
    /// Arena slot of this node
    pub fn index(self) -> usize {
        self.index
    }

    pub fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.generation == 0 {
            write!(f, "#{}", self.index)
        } else {
            write!(f, "#{}v{}", self.index, self.generation)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text,
    Comment,
}

#[derive(Debug, Clone)]
enum NodeContent {
    Element {
        tag: String,
        attributes: BTreeMap<String, String>,
    },
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    content: NodeContent,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    data: Option<NodeData>,
}

#[derive(Debug, Default)]
struct DomTree {
    slots: Vec<Slot>,
    free: Vec<usize>,
    journal: Vec<MutationRecord>,
}

impl DomTree {
    fn insert(&mut self, content: NodeContent) -> NodeId {
        let data = NodeData {
            content,
            parent: None,
            children: Vec::new(),
        };

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.data = Some(data);
            return NodeId {
                index,
                generation: slot.generation,
            };
        }

        self.slots.push(Slot {
            generation: 0,
            data: Some(data),
        });
        NodeId {
            index: self.slots.len() - 1,
            generation: 0,
        }
    }

    fn node(&self, id: NodeId) -> Result<&NodeData, DomError> {
        self.slots
            .get(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.data.as_ref())
            .ok_or(DomError::NodeNotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut NodeData, DomError> {
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.data.as_mut())
            .ok_or(DomError::NodeNotFound(id))
    }

    /// Free `id` and its descendants. Subtrees rooted at a node in `keep`
    /// are cut loose instead. Returns the number of freed nodes.
    fn release(&mut self, id: NodeId, keep: &[NodeId]) -> usize {
        if keep.contains(&id) {
            if let Ok(node) = self.node_mut(id) {
                node.parent = None;
            }
            return 0;
        }

        let Some(slot) = self
            .slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation)
        else {
            return 0;
        };
        let Some(data) = slot.data.take() else {
            return 0;
        };
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);

        1 + data
            .children
            .into_iter()
            .map(|child| self.release(child, keep))
            .sum::<usize>()
    }

    fn attributes(&self, id: NodeId) -> Result<&BTreeMap<String, String>, DomError> {
        match &self.node(id)?.content {
            NodeContent::Element { attributes, .. } => Ok(attributes),
            _ => Err(DomError::NotAnElement(id)),
        }
    }

    fn attributes_mut(&mut self, id: NodeId) -> Result<&mut BTreeMap<String, String>, DomError> {
        match &mut self.node_mut(id)?.content {
            NodeContent::Element { attributes, .. } => Ok(attributes),
            _ => Err(DomError::NotAnElement(id)),
        }
    }

    /// Inclusive: a node contains itself
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.node(id).ok().and_then(|n| n.parent);
        }
        false
    }

    fn detach(&mut self, id: NodeId) -> Result<(), DomError> {
        let Some(parent) = self.node_mut(id)?.parent.take() else {
            return Ok(());
        };
        self.node_mut(parent)?.children.retain(|child| *child != id);
        self.journal.push(MutationRecord::child_list(parent));
        Ok(())
    }

    fn write_text(&self, id: NodeId, out: &mut String) {
        let Ok(node) = self.node(id) else {
            return;
        };
        match &node.content {
            NodeContent::Text(text) => out.push_str(text),
            NodeContent::Comment(_) => {}
            NodeContent::Element { .. } => {
                for child in &node.children {
                    self.write_text(*child, out);
                }
            }
        }
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        let Ok(node) = self.node(id) else {
            return;
        };
        match &node.content {
            NodeContent::Text(text) => out.push_str(&escape(text)),
            NodeContent::Comment(text) => {
                out.push_str("<!--");
                out.push_str(text);
                out.push_str("-->");
            }
            NodeContent::Element { tag, attributes } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attributes {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape(value));
                    out.push('"');
                }
                out.push('>');
                for child in &node.children {
                    self.write_html(*child, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Shared handle to a DOM tree
#[derive(Debug, Clone, Default)]
pub struct Dom {
    tree: Rc<RefCell<DomTree>>,
}

impl Dom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether both handles point at the same tree
    pub fn ptr_eq(&self, other: &Dom) -> bool {
        Rc::ptr_eq(&self.tree, &other.tree)
    }

    pub fn create_element(&self, tag: impl Into<String>) -> NodeId {
        self.tree.borrow_mut().insert(NodeContent::Element {
            tag: tag.into(),
            attributes: BTreeMap::new(),
        })
    }

    pub fn create_text(&self, content: impl Into<String>) -> NodeId {
        self.tree
            .borrow_mut()
            .insert(NodeContent::Text(content.into()))
    }

    pub fn create_comment(&self, content: impl Into<String>) -> NodeId {
        self.tree
            .borrow_mut()
            .insert(NodeContent::Comment(content.into()))
    }

    pub fn kind(&self, id: NodeId) -> Result<NodeKind, DomError> {
        Ok(match self.tree.borrow().node(id)?.content {
            NodeContent::Element { .. } => NodeKind::Element,
            NodeContent::Text(_) => NodeKind::Text,
            NodeContent::Comment(_) => NodeKind::Comment,
        })
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(self.kind(id), Ok(NodeKind::Element))
    }

    pub fn tag_name(&self, id: NodeId) -> Result<String, DomError> {
        match &self.tree.borrow().node(id)?.content {
            NodeContent::Element { tag, .. } => Ok(tag.clone()),
            _ => Err(DomError::NotAnElement(id)),
        }
    }

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<String> {
        self.tree
            .borrow()
            .attributes(id)
            .ok()
            .and_then(|attributes| attributes.get(name).cloned())
    }

    pub fn attributes(&self, id: NodeId) -> Result<BTreeMap<String, String>, DomError> {
        self.tree.borrow().attributes(id).cloned()
    }

    /// Set an attribute. Returns `false` (and journals nothing) when the
    /// attribute already holds `value`.
    pub fn set_attribute(
        &self,
        id: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<bool, DomError> {
        let name = name.into();
        let value = value.into();
        let mut tree = self.tree.borrow_mut();
        let attributes = tree.attributes_mut(id)?;

        if attributes.get(&name) == Some(&value) {
            return Ok(false);
        }

        attributes.insert(name.clone(), value);
        tree.journal.push(MutationRecord::attribute(id, name));
        Ok(true)
    }

    pub fn remove_attribute(&self, id: NodeId, name: &str) -> Result<bool, DomError> {
        let mut tree = self.tree.borrow_mut();
        if tree.attributes_mut(id)?.remove(name).is_none() {
            return Ok(false);
        }
        tree.journal.push(MutationRecord::attribute(id, name));
        Ok(true)
    }

    pub fn class_list(&self, id: NodeId) -> Result<Vec<String>, DomError> {
        let tree = self.tree.borrow();
        Ok(tree
            .attributes(id)?
            .get("class")
            .map(|classes| classes.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default())
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.class_list(id)
            .map(|classes| classes.iter().any(|c| c == class))
            .unwrap_or(false)
    }

    pub fn add_class(&self, id: NodeId, class: &str) -> Result<bool, DomError> {
        let mut classes = self.class_list(id)?;
        if classes.iter().any(|c| c == class) {
            return Ok(false);
        }
        classes.push(class.to_string());
        self.set_attribute(id, "class", classes.join(" "))
    }

    pub fn remove_class(&self, id: NodeId, class: &str) -> Result<bool, DomError> {
        let classes = self.class_list(id)?;
        if !classes.iter().any(|c| c == class) {
            return Ok(false);
        }
        let remaining: Vec<_> = classes.into_iter().filter(|c| c != class).collect();
        self.set_attribute(id, "class", remaining.join(" "))
    }

    /// Append `child` to `parent`, moving it out of its current parent first.
    pub fn append_child(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let mut tree = self.tree.borrow_mut();
        tree.attributes(parent)?;
        tree.node(child)?;

        if tree.contains(child, parent) {
            warn!(%parent, %child, "Rejected append that would create a cycle");
            return Err(DomError::HierarchyRequest { parent, child });
        }

        tree.detach(child)?;
        tree.node_mut(child)?.parent = Some(parent);
        tree.node_mut(parent)?.children.push(child);
        tree.journal.push(MutationRecord::child_list(parent));
        Ok(())
    }

    /// Detach `id`, then free it and every descendant so their slots can be
    /// reused. Subtrees rooted at a node in `keep` are detached and stay
    /// alive. Returns the number of freed nodes.
    pub fn remove_subtree(&self, id: NodeId, keep: &[NodeId]) -> Result<usize, DomError> {
        let mut tree = self.tree.borrow_mut();
        tree.detach(id)?;
        let freed = tree.release(id, keep);
        trace!(%id, freed, "Removed subtree");
        Ok(freed)
    }

    /// Whether `id` still refers to a live node
    pub fn exists(&self, id: NodeId) -> bool {
        self.tree.borrow().node(id).is_ok()
    }

    pub fn children(&self, id: NodeId) -> Result<Vec<NodeId>, DomError> {
        Ok(self.tree.borrow().node(id)?.children.clone())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.tree.borrow().node(id).ok().and_then(|n| n.parent)
    }

    /// Whether `node` is `ancestor` or one of its descendants
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.tree.borrow().contains(ancestor, node)
    }

    pub fn set_text(&self, id: NodeId, content: impl Into<String>) -> Result<(), DomError> {
        let mut tree = self.tree.borrow_mut();
        match &mut tree.node_mut(id)?.content {
            NodeContent::Text(text) | NodeContent::Comment(text) => *text = content.into(),
            NodeContent::Element { .. } => return Err(DomError::NotText(id)),
        }
        tree.journal.push(MutationRecord::character_data(id));
        Ok(())
    }

    pub fn text_content(&self, id: NodeId) -> Result<String, DomError> {
        let tree = self.tree.borrow();
        tree.node(id)?;
        let mut out = String::new();
        tree.write_text(id, &mut out);
        Ok(out)
    }

    pub fn outer_html(&self, id: NodeId) -> Result<String, DomError> {
        let tree = self.tree.borrow();
        tree.node(id)?;
        let mut out = String::new();
        tree.write_html(id, &mut out);
        Ok(out)
    }

    /// Drain the mutation journal
    pub fn take_records(&self) -> Vec<MutationRecord> {
        let records = std::mem::take(&mut self.tree.borrow_mut().journal);
        trace!(count = records.len(), "Drained mutation journal");
        records
    }

    /// Number of live nodes, attached or not
    pub fn len(&self) -> usize {
        let tree = self.tree.borrow();
        tree.slots.len() - tree.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MutationKind;

    #[test]
    fn test_set_attribute_skips_unchanged_values() {
        let dom = Dom::new();
        let div = dom.create_element("div");

        assert!(dom.set_attribute(div, "id", "a").unwrap());
        assert!(!dom.set_attribute(div, "id", "a").unwrap());

        let records = dom.take_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].kind, MutationKind::Attributes);
        assert_eq!(records[0].attribute_name.as_deref(), Some("id"));
    }

    #[test]
    fn test_append_moves_between_parents() {
        let dom = Dom::new();
        let a = dom.create_element("div");
        let b = dom.create_element("div");
        let child = dom.create_element("span");

        dom.append_child(a, child).unwrap();
        dom.append_child(b, child).unwrap();

        assert!(dom.children(a).unwrap().is_empty());
        assert_eq!(dom.children(b).unwrap(), vec![child]);
        assert_eq!(dom.parent(child), Some(b));
    }

    #[test]
    fn test_append_rejects_cycles() {
        let dom = Dom::new();
        let outer = dom.create_element("div");
        let inner = dom.create_element("div");
        dom.append_child(outer, inner).unwrap();

        let result = dom.append_child(inner, outer);
        assert_eq!(
            result,
            Err(DomError::HierarchyRequest {
                parent: inner,
                child: outer
            })
        );
    }

    #[test]
    fn test_append_into_text_node_fails() {
        let dom = Dom::new();
        let text = dom.create_text("hello");
        let span = dom.create_element("span");

        assert_eq!(dom.append_child(text, span), Err(DomError::NotAnElement(text)));
    }

    #[test]
    fn test_contains_is_inclusive() {
        let dom = Dom::new();
        let root = dom.create_element("div");
        let mid = dom.create_element("p");
        let leaf = dom.create_text("x");
        let other = dom.create_element("div");
        dom.append_child(root, mid).unwrap();
        dom.append_child(mid, leaf).unwrap();

        assert!(dom.contains(root, root));
        assert!(dom.contains(root, leaf));
        assert!(!dom.contains(mid, root));
        assert!(!dom.contains(root, other));
    }

    #[test]
    fn test_class_list_round_trip() {
        let dom = Dom::new();
        let div = dom.create_element("div");
        dom.set_attribute(div, "class", "callout").unwrap();

        assert!(dom.add_class(div, "selected").unwrap());
        assert!(!dom.add_class(div, "selected").unwrap());
        assert_eq!(dom.get_attribute(div, "class").as_deref(), Some("callout selected"));

        assert!(dom.remove_class(div, "selected").unwrap());
        assert!(!dom.has_class(div, "selected"));
        assert!(dom.has_class(div, "callout"));
    }

    #[test]
    fn test_remove_subtree_frees_and_reuses_slots() {
        let dom = Dom::new();
        let root = dom.create_element("div");
        let card = dom.create_element("article");
        let body = dom.create_element("section");
        let kept = dom.create_element("p");
        let text = dom.create_text("inside");
        dom.append_child(root, card).unwrap();
        dom.append_child(card, body).unwrap();
        dom.append_child(body, kept).unwrap();
        dom.append_child(kept, text).unwrap();
        assert_eq!(dom.len(), 5);

        assert_eq!(dom.remove_subtree(card, &[kept]).unwrap(), 2);

        assert_eq!(dom.len(), 3);
        assert!(dom.children(root).unwrap().is_empty());
        assert!(!dom.exists(card));
        assert!(!dom.exists(body));
        assert_eq!(dom.parent(kept), None);
        assert_eq!(dom.parent(text), Some(kept));

        let reused = dom.create_element("span");
        assert_eq!(reused.index(), body.index());
        assert_ne!(reused, body);
        assert_eq!(dom.tag_name(body), Err(DomError::NodeNotFound(body)));
        assert!(!dom.contains(root, body));
    }

    #[test]
    fn test_outer_html_escapes() {
        let dom = Dom::new();
        let p = dom.create_element("p");
        let text = dom.create_text("a < b");
        dom.set_attribute(p, "title", "\"q\"").unwrap();
        dom.append_child(p, text).unwrap();

        assert_eq!(
            dom.outer_html(p).unwrap(),
            "<p title=\"&quot;q&quot;\">a &lt; b</p>"
        );
        assert_eq!(dom.text_content(p).unwrap(), "a < b");
    }
}
