use crate::{Dom, DomError, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Virtual DOM node returned by node view components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum VNode {
    /// HTML element
    Element {
        tag: String,
        attributes: BTreeMap<String, String>,
        children: Vec<VNode>,
        /// Marks the element that should receive the node's editable content
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        content_ref: bool,
    },

    /// Text node
    Text { content: String },

    /// Comment node
    Comment { content: String },
}

/// Result of mounting a [`VNode`] into a [`Dom`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MountedVNode {
    pub root: NodeId,
    /// First element flagged with [`VNode::content_ref`], in document order
    pub content_ref: Option<NodeId>,
}

impl VNode {
    pub fn element(tag: impl Into<String>) -> Self {
        VNode::Element {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
            content_ref: false,
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        VNode::Text {
            content: content.into(),
        }
    }

    pub fn comment(content: impl Into<String>) -> Self {
        VNode::Comment {
            content: content.into(),
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let VNode::Element {
            ref mut attributes, ..
        } = self
        {
            attributes.insert(key.into(), value.into());
        }
        self
    }

    pub fn with_child(mut self, child: VNode) -> Self {
        if let VNode::Element {
            ref mut children, ..
        } = self
        {
            children.push(child);
        }
        self
    }

    pub fn with_children(mut self, new_children: Vec<VNode>) -> Self {
        if let VNode::Element {
            ref mut children, ..
        } = self
        {
            children.extend(new_children);
        }
        self
    }

    /// Flag this element as the target for the node's content DOM
    pub fn content_ref(mut self) -> Self {
        if let VNode::Element {
            ref mut content_ref,
            ..
        } = self
        {
            *content_ref = true;
        }
        self
    }

    /// Build real DOM nodes for this tree. The result is detached.
    pub fn mount(&self, dom: &Dom) -> Result<MountedVNode, DomError> {
        let mut content_ref = None;
        let root = self.build(dom, &mut content_ref)?;
        Ok(MountedVNode { root, content_ref })
    }

    fn build(&self, dom: &Dom, content_ref: &mut Option<NodeId>) -> Result<NodeId, DomError> {
        match self {
            VNode::Element {
                tag,
                attributes,
                children,
                content_ref: is_ref,
            } => {
                let element = dom.create_element(tag.as_str());
                for (name, value) in attributes {
                    dom.set_attribute(element, name.as_str(), value.as_str())?;
                }
                if *is_ref && content_ref.is_none() {
                    *content_ref = Some(element);
                }
                for child in children {
                    let child = child.build(dom, content_ref)?;
                    dom.append_child(element, child)?;
                }
                Ok(element)
            }
            VNode::Text { content } => Ok(dom.create_text(content.as_str())),
            VNode::Comment { content } => Ok(dom.create_comment(content.as_str())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_builds_tree_and_finds_content_ref() {
        let dom = Dom::new();
        let vnode = VNode::element("figure")
            .with_attr("class", "card")
            .with_child(VNode::element("figcaption").with_child(VNode::text("Title")))
            .with_child(VNode::element("div").content_ref());

        let mounted = vnode.mount(&dom).unwrap();

        assert_eq!(dom.tag_name(mounted.root).unwrap(), "figure");
        let content_ref = mounted.content_ref.expect("content ref");
        assert_eq!(dom.tag_name(content_ref).unwrap(), "div");
        assert!(dom.contains(mounted.root, content_ref));
        assert_eq!(
            dom.outer_html(mounted.root).unwrap(),
            "<figure class=\"card\"><figcaption>Title</figcaption><div></div></figure>"
        );
    }

    #[test]
    fn test_vnode_serialization() {
        let vnode = VNode::element("p").with_child(VNode::text("hi"));
        let json = serde_json::to_value(&vnode).unwrap();

        assert_eq!(json["type"], "Element");
        assert!(json.get("content_ref").is_none());

        let back: VNode = serde_json::from_value(json).unwrap();
        assert_eq!(back, vnode);
    }
}
