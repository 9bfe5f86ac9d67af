//! # Node View Bridge
//!
//! Implements the engine's node view contract by rendering a component
//! into the node view's root element.
//!
//! Two lifecycles meet here:
//!
//! ```text
//! engine (imperative)                 component (declarative)
//! ───────────────────                 ───────────────────────
//! create ─→ root element, content DOM
//! update ─→ sync root attributes ──┐
//! select / deselect ─→ class ──────┼─→ props snapshot ─→ PortalRegistry::render
//!                                  │
//! destroy ─────────────────────────┴─→ PortalRegistry::remove
//! ```
//!
//! They share only the root element's identity and the props snapshot
//! handed to the registry.

use crate::attributes::{sync_dom_attributes, write_dom_attributes};
use crate::{
    ComponentDefinition, ComponentOptions, NodeViewError, NodeViewExtension, NodeViewProps,
    PortalRegistry,
};
use portico_dom::{Dom, MutationRecord, NodeId};
use portico_editor::{
    Attrs, ContentNode, DecorationSet, DomOutputSpec, EditorError, EditorView, GetPosition,
    NodeView, NodeViewFactory, PositionLookup, SELECTED_NODE_CLASS_NAME,
};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, warn};

pub struct NodeViewBridge {
    /// Shared with the `update_attributes` callbacks handed to the component
    node: Rc<RefCell<ContentNode>>,
    decorations: DecorationSet,
    view: Rc<dyn EditorView>,
    dom: Dom,
    root: NodeId,
    content_dom: Option<NodeId>,
    selected: bool,
    get_position: GetPosition,
    registry: PortalRegistry,
    extension: NodeViewExtension,
    display_name: String,
    destroyed: bool,
}

impl NodeViewBridge {
    /// Factory with the engine's node view signature
    pub fn factory(
        registry: PortalRegistry,
        extension: NodeViewExtension,
        options: ComponentOptions,
    ) -> NodeViewFactory {
        Rc::new(
            move |node: ContentNode,
                  view: Rc<dyn EditorView>,
                  position: PositionLookup|
                  -> Result<Box<dyn NodeView>, EditorError> {
                let bridge = NodeViewBridge::create(
                    node,
                    view,
                    position,
                    registry.clone(),
                    extension.clone(),
                    &options,
                )?;
                Ok(Box::new(bridge) as Box<dyn NodeView>)
            },
        )
    }

    /// Create the node view's DOM and render the component into it
    pub fn create(
        node: ContentNode,
        view: Rc<dyn EditorView>,
        position: PositionLookup,
        registry: PortalRegistry,
        extension: NodeViewExtension,
        options: &ComponentOptions,
    ) -> Result<Self, NodeViewError> {
        let get_position = position.as_node().cloned().ok_or(NodeViewError::NotANode)?;

        let dom = view.document().clone();
        let spec = node.node_type().to_dom(&node);
        let root = create_root(&dom, &node, spec.as_ref(), options)?;
        let content_dom = create_content_dom(&dom, &node, spec.as_ref(), view.editable(), options)?;

        write_dom_attributes(&dom, &node, spec.as_ref(), root)?;

        let display_name = extension.display_name();
        debug!(
            node_type = %node.node_type().name(),
            component = %display_name,
            %root,
            content_dom = content_dom.is_some(),
            "Creating node view"
        );

        let bridge = Self {
            node: Rc::new(RefCell::new(node)),
            decorations: DecorationSet::default(),
            view,
            dom,
            root,
            content_dom,
            selected: false,
            get_position,
            registry,
            extension,
            display_name,
            destroyed: false,
        };

        bridge.render_component()?;
        Ok(bridge)
    }

    pub fn dom(&self) -> NodeId {
        self.root
    }

    pub fn content_dom(&self) -> Option<NodeId> {
        self.content_dom
    }

    pub fn node(&self) -> ContentNode {
        self.node.borrow().clone()
    }

    pub fn decorations(&self) -> &DecorationSet {
        &self.decorations
    }

    pub fn selected(&self) -> bool {
        self.selected
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn position(&self) -> usize {
        (self.get_position)()
    }

    /// Point the view at a new node. `Ok(false)` means the node has a
    /// different type and this view must be recreated.
    pub fn update(
        &mut self,
        node: &ContentNode,
        decorations: &DecorationSet,
    ) -> Result<bool, NodeViewError> {
        let current = self.node();
        if !node.same_type(&current) {
            debug!(
                from = %current.node_type().name(),
                to = %node.node_type().name(),
                "Node type changed, node view must be recreated"
            );
            return Ok(false);
        }

        if node.ptr_eq(&current) && decorations.ptr_eq(&self.decorations) {
            return Ok(true);
        }

        if !current.same_markup(node) {
            sync_dom_attributes(&self.dom, node, self.root)?;
        }

        *self.node.borrow_mut() = node.clone();
        self.decorations = decorations.clone();
        self.render_component()?;
        Ok(true)
    }

    pub fn select_node(&mut self) -> Result<(), NodeViewError> {
        self.selected = true;
        self.dom.add_class(self.root, SELECTED_NODE_CLASS_NAME)?;
        self.render_component()
    }

    pub fn deselect_node(&mut self) -> Result<(), NodeViewError> {
        self.selected = false;
        self.dom.remove_class(self.root, SELECTED_NODE_CLASS_NAME)?;
        self.render_component()
    }

    /// Only mutations inside the content DOM (and selection changes) are
    /// edits; everything else under the root belongs to the component.
    pub fn ignore_mutation(&self, mutation: &MutationRecord) -> bool {
        if mutation.is_selection() {
            return false;
        }

        let Some(content_dom) = self.content_dom else {
            return true;
        };

        !self.dom.contains(content_dom, mutation.target)
    }

    /// Remove this view's portal. Later calls do nothing.
    pub fn destroy(&mut self) -> Result<(), NodeViewError> {
        if self.destroyed {
            return Ok(());
        }
        self.destroyed = true;

        debug!(component = %self.display_name, root = %self.root, "Destroying node view");
        self.registry.remove(self.root)
    }

    fn render_component(&self) -> Result<(), NodeViewError> {
        let component = self
            .extension
            .component()
            .cloned()
            .ok_or_else(|| NodeViewError::MissingComponent {
                extension: self.extension.name().to_string(),
            })?;

        let definition = ComponentDefinition {
            display_name: self.display_name.clone(),
            component,
            props: self.props(),
        };

        self.registry.render(definition, self.root)
    }

    fn props(&self) -> NodeViewProps {
        NodeViewProps {
            node: self.node(),
            selected: self.selected,
            view: self.view.clone(),
            options: self.extension.options().clone(),
            decorations: self.decorations.clone(),
            get_position: self.get_position.clone(),
            content_dom: self.content_dom,
            forward_ref: self.forward_ref(),
            update_attributes: self.update_attributes(),
        }
    }

    fn forward_ref(&self) -> crate::ForwardRef {
        let dom = self.dom.clone();
        let content_dom = self.content_dom;
        let extension = self.extension.name().to_string();

        Rc::new(move |element: NodeId| -> Result<(), NodeViewError> {
            let content_dom = content_dom.ok_or_else(|| NodeViewError::NoContentSlot {
                extension: extension.clone(),
            })?;
            dom.append_child(element, content_dom)?;
            Ok(())
        })
    }

    fn update_attributes(&self) -> crate::UpdateAttributes {
        let view = self.view.clone();
        let get_position = self.get_position.clone();
        let node = self.node.clone();

        Rc::new(move |attrs: Attrs| -> Result<(), NodeViewError> {
            let current = node.borrow().clone();
            if !view.editable() {
                debug!(node_type = %current.node_type().name(), "Ignoring attribute update, view is not editable");
                return Ok(());
            }

            let mut merged = current.attrs().clone();
            merged.extend(attrs);

            let tr = view
                .state()
                .tr()
                .set_node_markup(get_position(), None, merged)?;
            view.dispatch(tr)?;
            Ok(())
        })
    }
}

fn create_root(
    dom: &Dom,
    node: &ContentNode,
    spec: Option<&DomOutputSpec>,
    options: &ComponentOptions,
) -> Result<NodeId, NodeViewError> {
    match spec {
        None if node.is_inline() => Ok(dom.create_element(options.default_inline_node.as_str())),
        None => Ok(dom.create_element(options.default_block_node.as_str())),
        Some(DomOutputSpec::Tag(tag)) => Ok(dom.create_element(tag.as_str())),
        Some(DomOutputSpec::Node(existing)) => {
            if dom.is_element(*existing) {
                Ok(*existing)
            } else {
                Err(NodeViewError::InvalidDomSpec(format!(
                    "{} is not an element",
                    existing
                )))
            }
        }
        Some(DomOutputSpec::Structure { tag, .. }) => Ok(dom.create_element(tag.as_str())),
        Some(DomOutputSpec::Hole) => Err(NodeViewError::InvalidDomSpec(
            "the content hole cannot be the outer node".to_string(),
        )),
    }
}

fn create_content_dom(
    dom: &Dom,
    node: &ContentNode,
    spec: Option<&DomOutputSpec>,
    editable: bool,
    options: &ComponentOptions,
) -> Result<Option<NodeId>, NodeViewError> {
    if node.is_leaf() {
        return Ok(None);
    }

    match spec {
        Some(spec) if spec.has_hole() => {
            let element = dom.create_element(options.default_content_node.as_str());
            dom.set_attribute(element, "contenteditable", editable.to_string())?;
            Ok(Some(element))
        }
        _ => Ok(None),
    }
}

impl NodeView for NodeViewBridge {
    fn dom(&self) -> NodeId {
        self.root
    }

    fn content_dom(&self) -> Option<NodeId> {
        self.content_dom
    }

    fn update(&mut self, node: &ContentNode, decorations: &DecorationSet) -> Result<bool, EditorError> {
        Ok(NodeViewBridge::update(self, node, decorations)?)
    }

    fn select_node(&mut self) -> Result<(), EditorError> {
        Ok(NodeViewBridge::select_node(self)?)
    }

    fn deselect_node(&mut self) -> Result<(), EditorError> {
        Ok(NodeViewBridge::deselect_node(self)?)
    }

    fn ignore_mutation(&self, mutation: &MutationRecord) -> bool {
        NodeViewBridge::ignore_mutation(self, mutation)
    }

    fn destroy(&mut self) {
        if let Err(e) = NodeViewBridge::destroy(self) {
            warn!(error = %e, root = %self.root, "Failed to remove portal");
        }
    }
}

impl fmt::Debug for NodeViewBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeViewBridge")
            .field("display_name", &self.display_name)
            .field("node", &*self.node.borrow())
            .field("root", &self.root)
            .field("content_dom", &self.content_dom)
            .field("selected", &self.selected)
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}
