//! # Content Nodes
//!
//! Immutable document tree. Nodes are shared (`Rc`) and never mutated; an
//! edit produces a new tree that reuses every untouched subtree, so
//! referential identity ([`ContentNode::ptr_eq`]) is a cheap "unchanged"
//! check.
//!
//! ## Positions
//!
//! Positions count tokens the way the engine does: entering or leaving a
//! non-leaf node is one token each, a leaf is one token, and a text node is
//! one token per character. Position `0` is the start of the root's content.

use crate::NodeType;
use serde_json::Value;
use std::fmt;
use std::rc::Rc;

/// Node attributes
pub type Attrs = serde_json::Map<String, Value>;

struct NodeInner {
    node_type: NodeType,
    attrs: Attrs,
    content: Vec<ContentNode>,
    text: Option<String>,
}

#[derive(Clone)]
pub struct ContentNode(Rc<NodeInner>);

impl ContentNode {
    pub(crate) fn new(
        node_type: NodeType,
        attrs: Attrs,
        content: Vec<ContentNode>,
        text: Option<String>,
    ) -> Self {
        ContentNode(Rc::new(NodeInner {
            node_type,
            attrs,
            content,
            text,
        }))
    }

    /// Create a text node of the given (text) type
    pub fn text(node_type: &NodeType, text: impl Into<String>) -> Self {
        Self::new(node_type.clone(), Attrs::new(), Vec::new(), Some(text.into()))
    }

    pub fn node_type(&self) -> &NodeType {
        &self.0.node_type
    }

    pub fn attrs(&self) -> &Attrs {
        &self.0.attrs
    }

    pub fn attr(&self, name: &str) -> Option<&Value> {
        self.0.attrs.get(name)
    }

    pub fn content(&self) -> &[ContentNode] {
        &self.0.content
    }

    pub fn text_content(&self) -> String {
        match &self.0.text {
            Some(text) => text.clone(),
            None => self.0.content.iter().map(ContentNode::text_content).collect(),
        }
    }

    pub fn is_text(&self) -> bool {
        self.0.text.is_some()
    }

    pub fn is_leaf(&self) -> bool {
        self.0.node_type.is_leaf()
    }

    pub fn is_inline(&self) -> bool {
        self.0.node_type.is_inline()
    }

    /// Referential identity
    pub fn ptr_eq(&self, other: &ContentNode) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn has_type(&self, node_type: &NodeType) -> bool {
        self.0.node_type == *node_type
    }

    pub fn same_type(&self, other: &ContentNode) -> bool {
        self.has_type(&other.0.node_type)
    }

    /// Same type and attributes; content is ignored
    pub fn same_markup(&self, other: &ContentNode) -> bool {
        self.same_type(other) && self.0.attrs == other.0.attrs
    }

    pub fn node_size(&self) -> usize {
        if let Some(text) = &self.0.text {
            text.chars().count()
        } else if self.is_leaf() {
            1
        } else {
            self.content_size() + 2
        }
    }

    pub fn content_size(&self) -> usize {
        self.0.content.iter().map(ContentNode::node_size).sum()
    }

    /// Copy of this node with different markup and the same content
    pub fn with_markup(&self, node_type: Option<&NodeType>, attrs: Attrs) -> ContentNode {
        Self::new(
            node_type.unwrap_or(&self.0.node_type).clone(),
            attrs,
            self.0.content.clone(),
            self.0.text.clone(),
        )
    }

    fn with_content(&self, content: Vec<ContentNode>) -> ContentNode {
        Self::new(
            self.0.node_type.clone(),
            self.0.attrs.clone(),
            content,
            self.0.text.clone(),
        )
    }

    /// The node starting at `pos`, relative to the start of this node's content
    pub fn node_at(&self, pos: usize) -> Option<ContentNode> {
        let mut offset = 0;
        for child in &self.0.content {
            let end = offset + child.node_size();
            if pos == offset {
                return Some(child.clone());
            }
            if pos < end {
                if child.is_text() {
                    return Some(child.clone());
                }
                return child.node_at(pos - offset - 1);
            }
            offset = end;
        }
        None
    }

    /// Rebuild the path to the node starting at `pos`, replacing that node
    /// with `f(node)`. Sibling subtrees are shared with `self`.
    pub fn map_node_at(
        &self,
        pos: usize,
        f: &dyn Fn(&ContentNode) -> ContentNode,
    ) -> Option<ContentNode> {
        let mut offset = 0;
        for (index, child) in self.0.content.iter().enumerate() {
            let end = offset + child.node_size();
            let replacement = if pos == offset {
                Some(f(child))
            } else if pos < end && !child.is_leaf() && !child.is_text() {
                child.map_node_at(pos - offset - 1, f)
            } else {
                None
            };

            if let Some(replacement) = replacement {
                let mut content = self.0.content.clone();
                content[index] = replacement;
                return Some(self.with_content(content));
            }
            if pos < end {
                return None;
            }
            offset = end;
        }
        None
    }
}

impl fmt::Debug for ContentNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(text) = &self.0.text {
            return write!(f, "{:?}", text);
        }
        let mut s = f.debug_struct(self.0.node_type.name());
        if !self.0.attrs.is_empty() {
            s.field("attrs", &self.0.attrs);
        }
        if !self.0.content.is_empty() {
            s.field("content", &self.0.content);
        }
        s.finish()
    }
}
