//! # Portal Registry
//!
//! Shared table of `container → component definition` for every component
//! node view of an editor, plus the queue of containers waiting to be
//! painted.
//!
//! ## Design
//!
//! - Bookkeeping is synchronous: after `render` the container is registered,
//!   after `remove` it is gone, before either call returns
//! - Painting goes through a [`PortalRenderer`] and may be deferred until
//!   [`PortalRegistry::flush`]
//! - A queued paint whose container was removed in the meantime is skipped
//! - The registry holds props snapshots keyed by container, never the node
//!   views themselves; each entry is removed by the node view that created it
//!
//! ```text
//! NodeViewBridge ── render(def, root) ──→ entries[root] = def, queue root
//!                                                  ↓ flush
//!                                   PortalRenderer::paint(root, def)
//! ```

use crate::{ComponentDefinition, NodeViewError, RenderMode};
use portico_dom::NodeId;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, trace, warn};

/// Paints component definitions into DOM containers
pub trait PortalRenderer {
    /// Mount or refresh the component in `container`
    fn paint(&self, container: NodeId, definition: &ComponentDefinition) -> Result<(), NodeViewError>;

    /// Tear down whatever `definition` painted into `container`
    fn unmount(&self, container: NodeId, definition: &ComponentDefinition) -> Result<(), NodeViewError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortalEvent {
    /// A render was requested for the container
    Rendered { container: NodeId, display_name: String },
    /// The container's entry was removed
    Removed { container: NodeId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(usize);

type Listener = Rc<dyn Fn(&PortalEvent)>;

struct RegistryState {
    entries: BTreeMap<NodeId, ComponentDefinition>,
    pending: Vec<NodeId>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: usize,
    mode: RenderMode,
}

/// Shared handle to the portal table
#[derive(Clone)]
pub struct PortalRegistry {
    state: Rc<RefCell<RegistryState>>,
    renderer: Rc<dyn PortalRenderer>,
}

impl PortalRegistry {
    pub fn new(renderer: Rc<dyn PortalRenderer>, mode: RenderMode) -> Self {
        Self {
            state: Rc::new(RefCell::new(RegistryState {
                entries: BTreeMap::new(),
                pending: Vec::new(),
                listeners: Vec::new(),
                next_listener: 0,
                mode,
            })),
            renderer,
        }
    }

    pub fn mode(&self) -> RenderMode {
        self.state.borrow().mode
    }

    /// Register (or replace) the definition for `container` and request a paint
    pub fn render(
        &self,
        definition: ComponentDefinition,
        container: NodeId,
    ) -> Result<(), NodeViewError> {
        let event = PortalEvent::Rendered {
            container,
            display_name: definition.display_name.clone(),
        };

        let mode = {
            let mut state = self.state.borrow_mut();
            let created = state.entries.insert(container, definition).is_none();
            if !state.pending.contains(&container) {
                state.pending.push(container);
            }
            trace!(%container, created, "Portal render requested");
            state.mode
        };

        self.emit(&event);

        if mode == RenderMode::Immediate {
            self.flush()?;
        }
        Ok(())
    }

    /// Unmount and forget `container`. No-op when it isn't registered.
    pub fn remove(&self, container: NodeId) -> Result<(), NodeViewError> {
        let removed = {
            let mut state = self.state.borrow_mut();
            state.pending.retain(|pending| *pending != container);
            state.entries.remove(&container)
        };

        let Some(definition) = removed else {
            trace!(%container, "Portal remove ignored, no entry");
            return Ok(());
        };

        trace!(%container, "Portal removed");
        self.renderer.unmount(container, &definition)?;
        self.emit(&PortalEvent::Removed { container });
        Ok(())
    }

    /// Paint every queued container that is still registered.
    ///
    /// Returns the number of containers painted. A failed paint does not
    /// stop the others: every container is attempted, the failed ones stay
    /// queued, and the first error is returned.
    pub fn flush(&self) -> Result<usize, NodeViewError> {
        let pending = std::mem::take(&mut self.state.borrow_mut().pending);
        let mut painted = 0;
        let mut failed = Vec::new();
        let mut first_error = None;

        for container in pending {
            let definition = self.state.borrow().entries.get(&container).cloned();
            let Some(definition) = definition else {
                trace!(%container, "Skipping paint for removed portal");
                continue;
            };

            match self.renderer.paint(container, &definition) {
                Ok(()) => painted += 1,
                Err(e) => {
                    warn!(%container, component = %definition.display_name, error = %e, "Portal paint failed");
                    failed.push(container);
                    first_error.get_or_insert(e);
                }
            }
        }

        if !failed.is_empty() {
            let mut state = self.state.borrow_mut();
            for container in failed {
                if state.entries.contains_key(&container) && !state.pending.contains(&container) {
                    state.pending.push(container);
                }
            }
        }

        if painted > 0 {
            debug!(painted, "Flushed portals");
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(painted),
        }
    }

    /// Queue every registered container for repaint
    pub fn force_update(&self) -> Result<(), NodeViewError> {
        let mode = {
            let mut state = self.state.borrow_mut();
            let containers: Vec<_> = state.entries.keys().copied().collect();
            for container in containers {
                if !state.pending.contains(&container) {
                    state.pending.push(container);
                }
            }
            state.mode
        };

        if mode == RenderMode::Immediate {
            self.flush()?;
        }
        Ok(())
    }

    pub fn subscribe(&self, listener: impl Fn(&PortalEvent) + 'static) -> ListenerId {
        let mut state = self.state.borrow_mut();
        let id = ListenerId(state.next_listener);
        state.next_listener += 1;
        state.listeners.push((id, Rc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut state = self.state.borrow_mut();
        let before = state.listeners.len();
        state.listeners.retain(|(listener_id, _)| *listener_id != id);
        state.listeners.len() != before
    }

    pub fn contains(&self, container: NodeId) -> bool {
        self.state.borrow().entries.contains_key(&container)
    }

    pub fn get(&self, container: NodeId) -> Option<ComponentDefinition> {
        self.state.borrow().entries.get(&container).cloned()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Registered containers and their display names, ordered by container
    pub fn portals(&self) -> Vec<(NodeId, String)> {
        self.state
            .borrow()
            .entries
            .iter()
            .map(|(container, definition)| (*container, definition.display_name.clone()))
            .collect()
    }

    /// Containers waiting for a paint
    pub fn pending(&self) -> Vec<NodeId> {
        self.state.borrow().pending.clone()
    }

    fn emit(&self, event: &PortalEvent) {
        let listeners: Vec<Listener> = self
            .state
            .borrow()
            .listeners
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();

        for listener in listeners {
            listener(event);
        }
    }
}

impl fmt::Debug for PortalRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("PortalRegistry")
            .field("mode", &state.mode)
            .field("entries", &state.entries.keys().collect::<Vec<_>>())
            .field("pending", &state.pending)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NodeViewExtension, NodeViewProps};
    use portico_dom::{Dom, VNode};
    use portico_editor::{
        Attrs, DecorationSet, EditorState, EditorView, MemoryView, NodeSpec, NodeType,
    };
    use std::cell::Cell;

    #[derive(Default)]
    struct CountingRenderer {
        paints: RefCell<Vec<NodeId>>,
        unmounts: RefCell<Vec<NodeId>>,
        broken: RefCell<Vec<NodeId>>,
    }

    impl PortalRenderer for CountingRenderer {
        fn paint(&self, container: NodeId, def: &ComponentDefinition) -> Result<(), NodeViewError> {
            if self.broken.borrow().contains(&container) {
                return Err(NodeViewError::MissingComponent {
                    extension: def.display_name.clone(),
                });
            }
            self.paints.borrow_mut().push(container);
            Ok(())
        }

        fn unmount(&self, container: NodeId, _: &ComponentDefinition) -> Result<(), NodeViewError> {
            self.unmounts.borrow_mut().push(container);
            Ok(())
        }
    }

    fn empty(_: &NodeViewProps) -> Result<VNode, NodeViewError> {
        Ok(VNode::element("span"))
    }

    fn definition(name: &str) -> ComponentDefinition {
        let node_type = NodeType::new("embed", NodeSpec::leaf());
        let node = node_type.create(Attrs::new(), vec![]);
        let doc = NodeType::new("doc", NodeSpec::with_content("block+"))
            .create(Attrs::new(), vec![node.clone()]);
        let view: Rc<dyn EditorView> =
            Rc::new(MemoryView::new(Dom::new(), EditorState::new(doc)).unwrap());
        let extension = NodeViewExtension::new(name).with_component(empty);

        ComponentDefinition {
            display_name: extension.display_name(),
            component: extension.component().cloned().unwrap(),
            props: NodeViewProps {
                node,
                selected: false,
                view,
                options: extension.options().clone(),
                decorations: DecorationSet::default(),
                get_position: Rc::new(|| 0),
                content_dom: None,
                forward_ref: Rc::new(|_| Ok(())),
                update_attributes: Rc::new(|_| Ok(())),
            },
        }
    }

    fn registry(mode: RenderMode) -> (PortalRegistry, Rc<CountingRenderer>) {
        let renderer = Rc::new(CountingRenderer::default());
        (PortalRegistry::new(renderer.clone(), mode), renderer)
    }

    #[test]
    fn test_render_upserts_in_place() {
        let (registry, renderer) = registry(RenderMode::Deferred);
        let container = Dom::new().create_element("div");

        registry.render(definition("AExtension"), container).unwrap();
        registry.render(definition("BExtension"), container).unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.pending(), vec![container]);
        assert_eq!(registry.portals(), vec![(container, "BNodeView".to_string())]);

        assert_eq!(registry.flush().unwrap(), 1);
        assert_eq!(*renderer.paints.borrow(), vec![container]);
        assert!(registry.pending().is_empty());
    }

    #[test]
    fn test_deferred_paint_after_remove_is_skipped() {
        let (registry, renderer) = registry(RenderMode::Deferred);
        let container = Dom::new().create_element("div");

        registry.render(definition("AExtension"), container).unwrap();
        registry.remove(container).unwrap();

        assert!(!registry.contains(container));
        assert_eq!(registry.flush().unwrap(), 0);
        assert!(renderer.paints.borrow().is_empty());
        assert_eq!(*renderer.unmounts.borrow(), vec![container]);
    }

    #[test]
    fn test_failed_paint_does_not_drop_other_portals() {
        let (registry, renderer) = registry(RenderMode::Deferred);
        let dom = Dom::new();
        let broken = dom.create_element("div");
        let healthy = dom.create_element("div");
        renderer.broken.borrow_mut().push(broken);

        registry.render(definition("AExtension"), broken).unwrap();
        registry.render(definition("BExtension"), healthy).unwrap();

        assert!(registry.flush().is_err());
        assert_eq!(*renderer.paints.borrow(), vec![healthy]);
        assert_eq!(registry.pending(), vec![broken]);

        renderer.broken.borrow_mut().clear();
        assert_eq!(registry.flush().unwrap(), 1);
        assert_eq!(*renderer.paints.borrow(), vec![healthy, broken]);
        assert!(registry.pending().is_empty());
    }

    #[test]
    fn test_remove_without_entry_is_noop() {
        let (registry, renderer) = registry(RenderMode::Deferred);
        let container = Dom::new().create_element("div");

        registry.remove(container).unwrap();

        assert!(renderer.unmounts.borrow().is_empty());
    }

    #[test]
    fn test_immediate_mode_paints_on_render() {
        let (registry, renderer) = registry(RenderMode::Immediate);
        let container = Dom::new().create_element("div");

        registry.render(definition("AExtension"), container).unwrap();

        assert_eq!(*renderer.paints.borrow(), vec![container]);
        assert!(registry.pending().is_empty());
    }

    #[test]
    fn test_listeners_see_render_and_remove() {
        let (registry, _) = registry(RenderMode::Deferred);
        let container = Dom::new().create_element("div");
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = events.clone();
        let id = registry.subscribe(move |event| sink.borrow_mut().push(event.clone()));

        registry.render(definition("AExtension"), container).unwrap();
        registry.remove(container).unwrap();

        assert_eq!(
            *events.borrow(),
            vec![
                PortalEvent::Rendered {
                    container,
                    display_name: "ANodeView".to_string()
                },
                PortalEvent::Removed { container },
            ]
        );

        assert!(registry.unsubscribe(id));
        assert!(!registry.unsubscribe(id));
    }

    #[test]
    fn test_listener_may_reenter_registry() {
        let (registry, _) = registry(RenderMode::Deferred);
        let container = Dom::new().create_element("div");
        let seen = Rc::new(Cell::new(0));
        let handle = registry.clone();
        let counter = seen.clone();
        registry.subscribe(move |_| counter.set(handle.len()));

        registry.render(definition("AExtension"), container).unwrap();

        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn test_force_update_queues_everything() {
        let (registry, renderer) = registry(RenderMode::Deferred);
        let dom = Dom::new();
        let a = dom.create_element("div");
        let b = dom.create_element("div");
        registry.render(definition("AExtension"), a).unwrap();
        registry.render(definition("BExtension"), b).unwrap();
        registry.flush().unwrap();

        registry.force_update().unwrap();
        assert_eq!(registry.flush().unwrap(), 2);
        assert_eq!(renderer.paints.borrow().len(), 4);
    }
}
