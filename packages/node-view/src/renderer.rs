use crate::{ComponentDefinition, NodeViewError, PortalRenderer};
use portico_dom::{Dom, NodeId};
use tracing::{debug, trace};

/// Paints component output straight into the host DOM.
///
/// Every paint replaces the container's children with a fresh build of the
/// component's [`portico_dom::VNode`] tree and frees the previous build. The
/// container itself is never replaced, and the node's content DOM is moved
/// into the new tree through `forward_ref` rather than rebuilt.
#[derive(Debug, Clone)]
pub struct DomPortalRenderer {
    dom: Dom,
}

impl DomPortalRenderer {
    pub fn new(dom: Dom) -> Self {
        Self { dom }
    }

    /// Free everything painted into `container`. The content DOM is only
    /// detached: the engine owns it and the node views rendered inside it.
    fn release_children(
        &self,
        container: NodeId,
        definition: &ComponentDefinition,
    ) -> Result<usize, NodeViewError> {
        let keep: Vec<NodeId> = definition.props.content_dom().into_iter().collect();
        let mut freed = 0;
        for child in self.dom.children(container)? {
            freed += self.dom.remove_subtree(child, &keep)?;
        }
        Ok(freed)
    }
}

impl PortalRenderer for DomPortalRenderer {
    fn paint(&self, container: NodeId, definition: &ComponentDefinition) -> Result<(), NodeViewError> {
        let vnode = definition.render()?;
        let mounted = vnode.mount(&self.dom)?;

        let freed = self.release_children(container, definition)?;
        self.dom.append_child(container, mounted.root)?;

        if let Some(target) = mounted.content_ref {
            definition.props.forward_ref(target)?;
        }

        debug!(
            %container,
            component = %definition.display_name,
            content_ref = mounted.content_ref.is_some(),
            freed,
            "Painted portal"
        );
        Ok(())
    }

    fn unmount(&self, container: NodeId, definition: &ComponentDefinition) -> Result<(), NodeViewError> {
        let freed = self.release_children(container, definition)?;
        trace!(%container, freed, "Unmounted portal");
        Ok(())
    }
}
