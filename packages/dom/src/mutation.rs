//! # Mutation Records
//!
//! Observer-style records of changes made to the DOM. The editing engine
//! reads them after each paint and asks the owning node view whether each
//! record is a real edit or something it should ignore.

use crate::NodeId;
use serde::{Deserialize, Serialize};

/// What changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MutationKind {
    Attributes,
    CharacterData,
    ChildList,
    /// Synthesized by the engine when the DOM selection moves; never journaled by [`crate::Dom`]
    Selection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationRecord {
    #[serde(rename = "type")]
    pub kind: MutationKind,

    pub target: NodeId,

    /// Attribute name for [`MutationKind::Attributes`] records
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub attribute_name: Option<String>,
}

impl MutationRecord {
    pub fn new(kind: MutationKind, target: NodeId) -> Self {
        Self {
            kind,
            target,
            attribute_name: None,
        }
    }

    pub fn selection(target: NodeId) -> Self {
        Self::new(MutationKind::Selection, target)
    }

    pub fn child_list(target: NodeId) -> Self {
        Self::new(MutationKind::ChildList, target)
    }

    pub fn character_data(target: NodeId) -> Self {
        Self::new(MutationKind::CharacterData, target)
    }

    pub fn attribute(target: NodeId, name: impl Into<String>) -> Self {
        Self {
            kind: MutationKind::Attributes,
            target,
            attribute_name: Some(name.into()),
        }
    }

    pub fn is_selection(&self) -> bool {
        self.kind == MutationKind::Selection
    }
}
