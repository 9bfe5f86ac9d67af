//! # Portico Node Views
//!
//! Render declarative components as the node views of a DOM-owning editor.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ editor: reconciliation pass                 │
//! │  create / update / select / destroy         │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ NodeViewBridge (one per node)               │
//! │  - owns root element + content DOM          │
//! │  - syncs root attributes                    │
//! │  - filters its own mutations                │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ PortalRegistry (one per editor)             │
//! │  container → component definition           │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ PortalRenderer: paints VNode trees          │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use portico_node_view::{
//!     ComponentOptions, DomPortalRenderer, NodeViewBridge, NodeViewExtension, PortalRegistry,
//! };
//!
//! let options = ComponentOptions::default();
//! let renderer = Rc::new(DomPortalRenderer::new(dom.clone()));
//! let registry = PortalRegistry::new(renderer, options.render_mode);
//!
//! let extension = NodeViewExtension::new("CalloutExtension").with_component(callout);
//! let factory = NodeViewBridge::factory(registry.clone(), extension, options);
//!
//! // The engine calls the factory for every callout node it renders
//! let node_view = factory(node, view, PositionLookup::at(pos))?;
//!
//! // Paint everything queued during the reconciliation pass
//! registry.flush()?;
//! ```

mod attributes;
mod bridge;
mod component;
mod error;
mod options;
mod portal;
mod renderer;

pub use attributes::{attribute_value, resolve_dom_attributes, sync_dom_attributes};
pub use bridge::NodeViewBridge;
pub use component::{
    ComponentDefinition, ForwardRef, NodeComponent, NodeViewExtension, NodeViewProps,
    UpdateAttributes,
};
pub use error::NodeViewError;
pub use options::{ComponentOptions, RenderMode};
pub use portal::{ListenerId, PortalEvent, PortalRegistry, PortalRenderer};
pub use renderer::DomPortalRenderer;
