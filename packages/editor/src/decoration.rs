use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::rc::Rc;

/// Ephemeral render hint attached to a range of the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decoration {
    pub from: usize,
    pub to: usize,
    /// Opaque payload; node views forward it without interpretation
    #[serde(default)]
    pub spec: serde_json::Value,
}

impl Decoration {
    pub fn new(from: usize, to: usize, spec: serde_json::Value) -> Self {
        Self { from, to, spec }
    }
}

/// Shared, immutable list of decorations handed to a node view per update.
///
/// Equality that matters to node views is referential: see [`DecorationSet::ptr_eq`].
#[derive(Debug, Clone, Default)]
pub struct DecorationSet(Rc<Vec<Decoration>>);

impl DecorationSet {
    pub fn new(decorations: Vec<Decoration>) -> Self {
        DecorationSet(Rc::new(decorations))
    }

    pub fn ptr_eq(&self, other: &DecorationSet) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for DecorationSet {
    type Target = [Decoration];

    fn deref(&self) -> &[Decoration] {
        &self.0
    }
}

impl From<Vec<Decoration>> for DecorationSet {
    fn from(decorations: Vec<Decoration>) -> Self {
        Self::new(decorations)
    }
}
