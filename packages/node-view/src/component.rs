//! # Node Components
//!
//! The contract between a node view and the component that renders it.
//! A component is called with a fresh [`NodeViewProps`] snapshot on every
//! render request and returns the [`VNode`] tree to paint into the node
//! view's root element.
//!
//! ```rust,ignore
//! let callout = |props: &NodeViewProps| -> Result<VNode, NodeViewError> {
//!     Ok(VNode::element("aside")
//!         .with_attr("data-selected", props.selected.to_string())
//!         .with_child(VNode::element("div").content_ref()))
//! };
//! let extension = NodeViewExtension::new("CalloutExtension").with_component(callout);
//! ```

use crate::NodeViewError;
use portico_dom::{NodeId, VNode};
use portico_editor::{Attrs, ContentNode, DecorationSet, EditorView, GetPosition};
use std::fmt;
use std::rc::Rc;

pub type UpdateAttributes = Rc<dyn Fn(Attrs) -> Result<(), NodeViewError>>;
pub type ForwardRef = Rc<dyn Fn(NodeId) -> Result<(), NodeViewError>>;

pub trait NodeComponent {
    fn render(&self, props: &NodeViewProps) -> Result<VNode, NodeViewError>;
}

impl<F> NodeComponent for F
where
    F: Fn(&NodeViewProps) -> Result<VNode, NodeViewError>,
{
    fn render(&self, props: &NodeViewProps) -> Result<VNode, NodeViewError> {
        self(props)
    }
}

/// Props every node component receives
#[derive(Clone)]
pub struct NodeViewProps {
    pub node: ContentNode,
    pub selected: bool,
    pub view: Rc<dyn EditorView>,
    pub options: serde_json::Value,
    pub decorations: DecorationSet,
    pub(crate) get_position: GetPosition,
    pub(crate) content_dom: Option<NodeId>,
    pub(crate) forward_ref: ForwardRef,
    pub(crate) update_attributes: UpdateAttributes,
}

impl NodeViewProps {
    /// Current position of the node in the document
    pub fn get_position(&self) -> usize {
        (self.get_position)()
    }

    /// The element holding the node's editable content, if it has one
    pub fn content_dom(&self) -> Option<NodeId> {
        self.content_dom
    }

    /// Mount the node's content DOM inside `element`
    pub fn forward_ref(&self, element: NodeId) -> Result<(), NodeViewError> {
        (self.forward_ref)(element)
    }

    /// Merge `attrs` into the node's attributes with a single transaction.
    /// Does nothing while the view is not editable.
    pub fn update_attributes(&self, attrs: Attrs) -> Result<(), NodeViewError> {
        (self.update_attributes)(attrs)
    }

    pub fn update_attributes_callback(&self) -> UpdateAttributes {
        self.update_attributes.clone()
    }
}

impl fmt::Debug for NodeViewProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeViewProps")
            .field("node", &self.node)
            .field("selected", &self.selected)
            .field("options", &self.options)
            .field("decorations", &self.decorations.len())
            .finish_non_exhaustive()
    }
}

/// A node type's opt-in to component rendering
#[derive(Clone)]
pub struct NodeViewExtension {
    name: String,
    component: Option<Rc<dyn NodeComponent>>,
    options: serde_json::Value,
}

impl NodeViewExtension {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            component: None,
            options: serde_json::Value::Object(Default::default()),
        }
    }

    pub fn with_component(mut self, component: impl NodeComponent + 'static) -> Self {
        self.component = Some(Rc::new(component));
        self
    }

    pub fn with_options(mut self, options: serde_json::Value) -> Self {
        self.options = options;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn component(&self) -> Option<&Rc<dyn NodeComponent>> {
        self.component.as_ref()
    }

    pub fn options(&self) -> &serde_json::Value {
        &self.options
    }

    /// `CalloutExtension` → `CalloutNodeView`
    pub fn display_name(&self) -> String {
        self.name.replacen("Extension", "NodeView", 1)
    }
}

impl fmt::Debug for NodeViewExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeViewExtension")
            .field("name", &self.name)
            .field("component", &self.component.is_some())
            .field("options", &self.options)
            .finish()
    }
}

/// What a portal renders: a component plus the props to call it with
#[derive(Clone)]
pub struct ComponentDefinition {
    pub display_name: String,
    pub component: Rc<dyn NodeComponent>,
    pub props: NodeViewProps,
}

impl ComponentDefinition {
    pub fn render(&self) -> Result<VNode, NodeViewError> {
        self.component.render(&self.props)
    }
}

impl fmt::Debug for ComponentDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDefinition")
            .field("display_name", &self.display_name)
            .field("props", &self.props)
            .finish_non_exhaustive()
    }
}
