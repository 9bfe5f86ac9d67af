use crate::{ContentNode, EditorError, Transaction};
use tracing::debug;

/// Snapshot of the editor: current document and version
#[derive(Debug, Clone)]
pub struct EditorState {
    doc: ContentNode,

    /// Increments on each applied transaction
    pub version: u64,
}

impl EditorState {
    pub fn new(doc: ContentNode) -> Self {
        Self { doc, version: 0 }
    }

    pub fn doc(&self) -> &ContentNode {
        &self.doc
    }

    /// Start a transaction against the current document
    pub fn tr(&self) -> Transaction {
        Transaction::new(self.doc.clone())
    }

    /// Produce the state that results from `tr`
    pub fn apply(&self, tr: &Transaction) -> Result<EditorState, EditorError> {
        let mut doc = self.doc.clone();
        for step in tr.steps() {
            doc = step.apply(&doc)?;
        }

        debug!(steps = tr.steps().len(), version = self.version + 1, "Applied transaction");

        Ok(EditorState {
            doc,
            version: self.version + 1,
        })
    }
}
