//! # Node Types
//!
//! A [`NodeType`] is the identity of a node kind. Two nodes have the same
//! type only when they share the same `NodeType` handle; names are for
//! diagnostics.
//!
//! Each type carries a [`NodeSpec`] with an optional `to_dom` serialization
//! function producing a [`DomOutputSpec`].

use crate::{Attrs, ContentNode};
use portico_dom::NodeId;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

pub type ToDom = Rc<dyn Fn(&ContentNode) -> DomOutputSpec>;

/// Recipe for the DOM representation of a node
#[derive(Debug, Clone, PartialEq)]
pub enum DomOutputSpec {
    /// Create an element with this tag
    Tag(String),

    /// Use an existing DOM node as-is
    Node(NodeId),

    /// `[tag, attrs?, ...children]`
    Structure {
        tag: String,
        attrs: Option<BTreeMap<String, String>>,
        children: Vec<DomOutputSpec>,
    },

    /// Where the node's content is rendered
    Hole,
}

impl DomOutputSpec {
    pub fn tag(tag: impl Into<String>) -> Self {
        DomOutputSpec::Tag(tag.into())
    }

    pub fn structure(tag: impl Into<String>) -> Self {
        DomOutputSpec::Structure {
            tag: tag.into(),
            attrs: None,
            children: Vec::new(),
        }
    }

    /// Add an attribute; creates the attribute object on first use
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        if let DomOutputSpec::Structure { ref mut attrs, .. } = self {
            attrs
                .get_or_insert_with(BTreeMap::new)
                .insert(name.into(), value.into());
        }
        self
    }

    /// Declare an (possibly empty) attribute object
    pub fn with_attrs(mut self, new_attrs: BTreeMap<String, String>) -> Self {
        if let DomOutputSpec::Structure { ref mut attrs, .. } = self {
            *attrs = Some(new_attrs);
        }
        self
    }

    pub fn child(mut self, child: DomOutputSpec) -> Self {
        if let DomOutputSpec::Structure {
            ref mut children, ..
        } = self
        {
            children.push(child);
        }
        self
    }

    pub fn hole(self) -> Self {
        self.child(DomOutputSpec::Hole)
    }

    /// Whether the hole marker is a direct entry of this spec
    pub fn has_hole(&self) -> bool {
        match self {
            DomOutputSpec::Structure { children, .. } => {
                children.iter().any(|child| matches!(child, DomOutputSpec::Hole))
            }
            _ => false,
        }
    }
}

/// Static description of a node type
#[derive(Clone, Default)]
pub struct NodeSpec {
    /// Content expression; `None` makes the type a leaf
    pub content: Option<String>,
    pub inline: bool,
    /// Default attribute values
    pub attrs: Attrs,
    pub to_dom: Option<ToDom>,
}

impl NodeSpec {
    pub fn leaf() -> Self {
        Self::default()
    }

    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn inline(mut self) -> Self {
        self.inline = true;
        self
    }

    pub fn default_attr(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.attrs.insert(name.into(), value);
        self
    }

    pub fn to_dom(mut self, to_dom: impl Fn(&ContentNode) -> DomOutputSpec + 'static) -> Self {
        self.to_dom = Some(Rc::new(to_dom));
        self
    }
}

impl fmt::Debug for NodeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeSpec")
            .field("content", &self.content)
            .field("inline", &self.inline)
            .field("attrs", &self.attrs)
            .field("to_dom", &self.to_dom.is_some())
            .finish()
    }
}

struct NodeTypeInner {
    name: String,
    spec: NodeSpec,
}

/// Identity of a node kind
#[derive(Clone)]
pub struct NodeType(Rc<NodeTypeInner>);

impl NodeType {
    pub fn new(name: impl Into<String>, spec: NodeSpec) -> Self {
        NodeType(Rc::new(NodeTypeInner {
            name: name.into(),
            spec,
        }))
    }

    /// Inline leaf type used for text nodes
    pub fn text() -> Self {
        Self::new("text", NodeSpec::leaf().inline())
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn spec(&self) -> &NodeSpec {
        &self.0.spec
    }

    pub fn is_leaf(&self) -> bool {
        self.0.spec.content.is_none()
    }

    pub fn is_inline(&self) -> bool {
        self.0.spec.inline
    }

    pub fn has_to_dom(&self) -> bool {
        self.0.spec.to_dom.is_some()
    }

    /// Run the type's serialization function, if it has one
    pub fn to_dom(&self, node: &ContentNode) -> Option<DomOutputSpec> {
        self.0.spec.to_dom.as_ref().map(|to_dom| to_dom(node))
    }

    /// Create a node, filling missing attributes from the `NodeSpec` defaults
    pub fn create(&self, attrs: Attrs, content: Vec<ContentNode>) -> ContentNode {
        let mut merged = self.0.spec.attrs.clone();
        merged.extend(attrs);
        ContentNode::new(self.clone(), merged, content, None)
    }
}

impl PartialEq for NodeType {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for NodeType {}

impl fmt::Debug for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeType({})", self.0.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_type_identity_is_by_handle() {
        let a = NodeType::new("callout", NodeSpec::with_content("block+"));
        let b = NodeType::new("callout", NodeSpec::with_content("block+"));

        assert_eq!(a, a.clone());
        assert_ne!(a, b);
    }

    #[test]
    fn test_hole_must_be_direct_entry() {
        let direct = DomOutputSpec::structure("div").hole();
        let nested = DomOutputSpec::structure("div").child(DomOutputSpec::structure("p").hole());

        assert!(direct.has_hole());
        assert!(!nested.has_hole());
        assert!(!DomOutputSpec::tag("div").has_hole());
    }

    #[test]
    fn test_attr_creates_attribute_object() {
        let spec = DomOutputSpec::structure("div").attr("class", "x").hole();

        match spec {
            DomOutputSpec::Structure { attrs, children, .. } => {
                assert_eq!(attrs.unwrap().get("class").map(String::as_str), Some("x"));
                assert_eq!(children, vec![DomOutputSpec::Hole]);
            }
            other => panic!("Expected structure, got {:?}", other),
        }
    }
}
