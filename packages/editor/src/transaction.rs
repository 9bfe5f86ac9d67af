//! # Transactions
//!
//! A [`Transaction`] is a batch of [`Step`]s built against one document and
//! carrying the resulting document.
//!
//! ## Step Semantics
//!
//! ### SetNodeMarkup
//! - Replaces the type and/or attributes of the node starting at `pos`
//! - Attributes are replaced wholesale; callers merge before building the step
//! - Content is kept as-is
//! - Fails if no node starts at `pos`

use crate::{Attrs, ContentNode, EditorError, NodeType};

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    SetNodeMarkup {
        pos: usize,
        node_type: Option<NodeType>,
        attrs: Attrs,
    },
}

#[derive(Debug, Clone)]
pub struct Transaction {
    before: ContentNode,
    doc: ContentNode,
    steps: Vec<Step>,
}

impl Transaction {
    pub fn new(doc: ContentNode) -> Self {
        Self {
            before: doc.clone(),
            doc,
            steps: Vec::new(),
        }
    }

    pub fn set_node_markup(
        mut self,
        pos: usize,
        node_type: Option<NodeType>,
        attrs: Attrs,
    ) -> Result<Self, EditorError> {
        let step = Step::SetNodeMarkup {
            pos,
            node_type,
            attrs,
        };
        self.doc = step.apply(&self.doc)?;
        self.steps.push(step);
        Ok(self)
    }

    /// Document before the first step
    pub fn before(&self) -> &ContentNode {
        &self.before
    }

    pub fn doc(&self) -> &ContentNode {
        &self.doc
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn doc_changed(&self) -> bool {
        !self.steps.is_empty()
    }
}

impl Step {
    pub fn apply(&self, doc: &ContentNode) -> Result<ContentNode, EditorError> {
        match self {
            Step::SetNodeMarkup {
                pos,
                node_type,
                attrs,
            } => doc
                .map_node_at(*pos, &|node| node.with_markup(node_type.as_ref(), attrs.clone()))
                .ok_or(EditorError::NoNodeAt(*pos)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NodeSpec;
    use serde_json::json;

    #[test]
    fn test_set_node_markup_replaces_attrs() {
        let doc_type = NodeType::new("doc", NodeSpec::with_content("block+"));
        let embed = NodeType::new("embed", NodeSpec::leaf());
        let node = embed.create(json!({"id": "a"}).as_object().cloned().unwrap(), vec![]);
        let doc = doc_type.create(Attrs::new(), vec![node]);

        let tr = Transaction::new(doc.clone())
            .set_node_markup(0, None, json!({"id": "b"}).as_object().cloned().unwrap())
            .unwrap();

        assert!(tr.doc_changed());
        assert!(tr.before().ptr_eq(&doc));
        assert_eq!(tr.doc().content()[0].attr("id"), Some(&json!("b")));
        assert!(tr.doc().content()[0].has_type(&embed));
    }

    #[test]
    fn test_set_node_markup_without_node_fails() {
        let doc_type = NodeType::new("doc", NodeSpec::with_content("block*"));
        let doc = doc_type.create(Attrs::new(), vec![]);

        let result = Transaction::new(doc).set_node_markup(3, None, Attrs::new());
        assert_eq!(result.err(), Some(EditorError::NoNodeAt(3)));
    }
}
