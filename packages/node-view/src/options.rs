//! # Component Options
//!
//! Configuration shared by every node view an editor creates.
//!
//! ```json
//! {
//!   "defaultBlockNode": "div",
//!   "defaultInlineNode": "span",
//!   "defaultContentNode": "span",
//!   "renderMode": "deferred"
//! }
//! ```
//!
//! Every field is optional.

use crate::NodeViewError;
use serde::{Deserialize, Serialize};

/// When the portal registry paints after a render request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Queue the container; paint on [`crate::PortalRegistry::flush`]
    #[default]
    Deferred,
    /// Paint before `render` returns
    Immediate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComponentOptions {
    /// Tag for block nodes whose type has no `to_dom`
    pub default_block_node: String,

    /// Tag for inline nodes whose type has no `to_dom`
    pub default_inline_node: String,

    /// Tag for the element that holds a node's editable content
    pub default_content_node: String,

    pub render_mode: RenderMode,
}

impl Default for ComponentOptions {
    fn default() -> Self {
        Self {
            default_block_node: "div".to_string(),
            default_inline_node: "span".to_string(),
            default_content_node: "span".to_string(),
            render_mode: RenderMode::Deferred,
        }
    }
}

impl ComponentOptions {
    pub fn from_json(source: &str) -> Result<Self, NodeViewError> {
        serde_json::from_str(source).map_err(|e| NodeViewError::InvalidOptions(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let options =
            ComponentOptions::from_json(r#"{"defaultContentNode": "div", "renderMode": "immediate"}"#)
                .unwrap();

        assert_eq!(options.default_block_node, "div");
        assert_eq!(options.default_inline_node, "span");
        assert_eq!(options.default_content_node, "div");
        assert_eq!(options.render_mode, RenderMode::Immediate);
    }

    #[test]
    fn test_invalid_json_is_rejected() {
        let result = ComponentOptions::from_json(r#"{"renderMode": "sometimes"}"#);
        assert!(matches!(result, Err(NodeViewError::InvalidOptions(_))));
    }
}
