//! # Attribute Synchronization
//!
//! Copies a node's markup onto the root element of its node view.
//!
//! | `to_dom` result              | attributes written          |
//! |------------------------------|-----------------------------|
//! | type has no `to_dom`         | none                        |
//! | tag name / existing DOM node | none                        |
//! | structure with attrs object  | the attrs object            |
//! | structure without attrs      | the node's own attrs        |

use portico_dom::{Dom, DomError, NodeId};
use portico_editor::{ContentNode, DomOutputSpec};
use serde_json::Value;
use std::collections::BTreeMap;

/// Write the node's DOM attributes onto `element`.
///
/// Returns the number of attributes that actually changed. Unchanged values
/// are not rewritten, so syncing the same node twice writes nothing the
/// second time.
pub fn sync_dom_attributes(dom: &Dom, node: &ContentNode, element: NodeId) -> Result<usize, DomError> {
    let spec = node.node_type().to_dom(node);
    write_dom_attributes(dom, node, spec.as_ref(), element)
}

pub(crate) fn write_dom_attributes(
    dom: &Dom,
    node: &ContentNode,
    spec: Option<&DomOutputSpec>,
    element: NodeId,
) -> Result<usize, DomError> {
    let mut written = 0;
    for (name, value) in resolve_dom_attributes(node, spec) {
        if dom.set_attribute(element, name, value)? {
            written += 1;
        }
    }
    Ok(written)
}

/// The attribute set a node's root element should carry
pub fn resolve_dom_attributes(
    node: &ContentNode,
    spec: Option<&DomOutputSpec>,
) -> BTreeMap<String, String> {
    match spec {
        Some(DomOutputSpec::Structure {
            attrs: Some(attrs), ..
        }) => attrs.clone(),
        Some(DomOutputSpec::Structure { attrs: None, .. }) => node
            .attrs()
            .iter()
            .map(|(name, value)| (name.clone(), attribute_value(value)))
            .collect(),
        _ => BTreeMap::new(),
    }
}

/// Stringify an attribute value the way it appears in the DOM
pub fn attribute_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portico_editor::{NodeSpec, NodeType};
    use serde_json::json;

    fn node_with(spec: NodeSpec) -> ContentNode {
        let node_type = NodeType::new("embed", spec);
        node_type.create(json!({"id": "a"}).as_object().cloned().unwrap(), vec![])
    }

    #[test]
    fn test_declared_attrs_win_over_node_attrs() {
        let node = node_with(
            NodeSpec::with_content("block+")
                .to_dom(|_| DomOutputSpec::structure("div").attr("class", "x").hole()),
        );
        let dom = Dom::new();
        let div = dom.create_element("div");

        sync_dom_attributes(&dom, &node, div).unwrap();

        let expected: BTreeMap<_, _> = [("class".to_string(), "x".to_string())].into();
        assert_eq!(dom.attributes(div).unwrap(), expected);
    }

    #[test]
    fn test_node_attrs_used_without_attrs_object() {
        let node = node_with(
            NodeSpec::with_content("block+").to_dom(|_| DomOutputSpec::structure("div").hole()),
        );
        let dom = Dom::new();
        let div = dom.create_element("div");

        sync_dom_attributes(&dom, &node, div).unwrap();

        let expected: BTreeMap<_, _> = [("id".to_string(), "a".to_string())].into();
        assert_eq!(dom.attributes(div).unwrap(), expected);
    }

    #[test]
    fn test_nothing_written_for_tag_or_missing_to_dom() {
        let dom = Dom::new();

        for spec in [
            NodeSpec::leaf(),
            NodeSpec::leaf().to_dom(|_| DomOutputSpec::tag("hr")),
        ] {
            let node = node_with(spec);
            let element = dom.create_element("div");
            assert_eq!(sync_dom_attributes(&dom, &node, element).unwrap(), 0);
            assert!(dom.attributes(element).unwrap().is_empty());
        }
    }

    #[test]
    fn test_sync_is_idempotent() {
        let node = node_with(NodeSpec::leaf().to_dom(|_| DomOutputSpec::structure("img")));
        let dom = Dom::new();
        let img = dom.create_element("img");

        assert_eq!(sync_dom_attributes(&dom, &node, img).unwrap(), 1);
        dom.take_records();

        assert_eq!(sync_dom_attributes(&dom, &node, img).unwrap(), 0);
        assert!(dom.take_records().is_empty());
    }

    #[test]
    fn test_attribute_values_are_stringified() {
        assert_eq!(attribute_value(&json!("red")), "red");
        assert_eq!(attribute_value(&json!(3)), "3");
        assert_eq!(attribute_value(&json!(true)), "true");
        assert_eq!(attribute_value(&json!(null)), "null");
    }
}
