use std::fmt::Write;

use crate::dom::{Document, DomError};

// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug)]
enum NodeKind {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
    },
    Text(String),
}

#[derive(Debug)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Offline, non-interactive document backed by an arena.
///
/// Detached nodes stay in the arena until the document is dropped; they are
/// unreachable from the tree and never serialized.
#[derive(Debug)]
pub struct VirtualDocument {
    nodes: Vec<NodeData>,
    root: NodeId,
}

impl Default for VirtualDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualDocument {
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        doc.root = doc.push(NodeKind::Element {
            tag: "html".to_string(),
            attributes: Vec::new(),
        });
        doc
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        self.nodes.push(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        });
        NodeId(self.nodes.len() - 1)
    }

    fn attributes(&self, node: NodeId) -> Option<&Vec<(String, String)>> {
        match &self.nodes[node.0].kind {
            NodeKind::Element { attributes, .. } => Some(attributes),
            NodeKind::Text(_) => None,
        }
    }

    fn attributes_mut(&mut self, node: NodeId) -> Option<&mut Vec<(String, String)>> {
        match &mut self.nodes[node.0].kind {
            NodeKind::Element { attributes, .. } => Some(attributes),
            NodeKind::Text(_) => None,
        }
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|child| *child != node);
        }
    }

    fn is_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes[id.0].parent;
        }
        false
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        match &self.nodes[node.0].kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element { .. } => {
                for child in &self.nodes[node.0].children {
                    self.collect_text(*child, out);
                }
            }
        }
    }

    fn serialize(&self, node: NodeId, out: &mut String) {
        match &self.nodes[node.0].kind {
            NodeKind::Text(text) => out.push_str(&html_escape::encode_text(text)),
            NodeKind::Element { tag, attributes } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attributes {
                    let _ = write!(
                        out,
                        " {}=\"{}\"",
                        name,
                        html_escape::encode_double_quoted_attribute(value)
                    );
                }
                out.push('>');

                if VOID_ELEMENTS.contains(&tag.as_str()) {
                    return;
                }

                for child in &self.nodes[node.0].children {
                    self.serialize(*child, out);
                }
                let _ = write!(out, "</{}>", tag);
            }
        }
    }

    /// Markup of `node` itself, including its own tag.
    pub fn outer_html(&self, node: &NodeId) -> String {
        let mut out = String::new();
        self.serialize(*node, &mut out);
        out
    }
}

impl Document for VirtualDocument {
    type Node = NodeId;

    fn create_element(&mut self, tag: &str) -> Result<NodeId, DomError> {
        let valid = !tag.is_empty() && tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        if !valid {
            return Err(DomError::CreateElement {
                tag: tag.to_string(),
                reason: "invalid tag name".to_string(),
            });
        }

        Ok(self.push(NodeKind::Element {
            tag: tag.to_ascii_lowercase(),
            attributes: Vec::new(),
        }))
    }

    fn document_element(&self) -> NodeId {
        self.root
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let mut stack = vec![self.root];
        while let Some(node) = stack.pop() {
            if self.attribute(&node, "id").as_deref() == Some(id) {
                return Some(node);
            }
            stack.extend(self.nodes[node.0].children.iter().rev().copied());
        }
        None
    }

    fn tag_name(&self, node: &NodeId) -> String {
        match &self.nodes[node.0].kind {
            NodeKind::Element { tag, .. } => tag.clone(),
            NodeKind::Text(_) => "#text".to_string(),
        }
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) {
        let Some(attributes) = self.attributes_mut(*node) else {
            return;
        };
        match attributes.iter_mut().find(|(existing, _)| existing == name) {
            Some((_, current)) => *current = value.to_string(),
            None => attributes.push((name.to_string(), value.to_string())),
        }
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.attributes(*node)?
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.clone())
    }

    fn add_class(&mut self, node: &NodeId, class: &str) {
        if self.has_class(node, class) {
            return;
        }
        let classes = match self.attribute(node, "class") {
            Some(existing) if !existing.trim().is_empty() => {
                format!("{} {}", existing.trim(), class)
            }
            _ => class.to_string(),
        };
        self.set_attribute(node, "class", &classes);
    }

    fn remove_class(&mut self, node: &NodeId, class: &str) {
        let Some(existing) = self.attribute(node, "class") else {
            return;
        };
        let remaining: Vec<&str> = existing
            .split_whitespace()
            .filter(|token| *token != class)
            .collect();
        self.set_attribute(node, "class", &remaining.join(" "));
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.attribute(node, "class")
            .map(|classes| classes.split_whitespace().any(|token| token == class))
            .unwrap_or(false)
    }

    fn set_text(&mut self, node: &NodeId, text: &str) {
        self.clear_children(node);
        let text_node = self.push(NodeKind::Text(text.to_string()));
        self.nodes[text_node.0].parent = Some(*node);
        self.nodes[node.0].children.push(text_node);
    }

    fn text(&self, node: &NodeId) -> String {
        let mut out = String::new();
        self.collect_text(*node, &mut out);
        out
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) {
        // Appending an ancestor under its own descendant would create a cycle.
        if self.is_descendant(*parent, *child) {
            return;
        }
        self.detach(*child);
        self.nodes[child.0].parent = Some(*parent);
        self.nodes[parent.0].children.push(*child);
    }

    fn clear_children(&mut self, node: &NodeId) {
        for child in std::mem::take(&mut self.nodes[node.0].children) {
            self.nodes[child.0].parent = None;
        }
    }

    fn children(&self, node: &NodeId) -> Vec<NodeId> {
        self.nodes[node.0]
            .children
            .iter()
            .copied()
            .filter(|child| matches!(self.nodes[child.0].kind, NodeKind::Element { .. }))
            .collect()
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    fn inner_html(&self, node: &NodeId) -> String {
        let mut out = String::new();
        for child in &self.nodes[node.0].children {
            self.serialize(*child, &mut out);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_serializes_attributes_in_insertion_order() {
        let mut doc = VirtualDocument::new();
        let button = doc.create_element("button").unwrap();
        doc.set_attribute(&button, "class", "command__btn");
        doc.set_attribute(&button, "type", "button");
        doc.set_attribute(&button, "data-command", "echo \"hi\" && exit");
        doc.set_text(&button, "Copy");

        assert_eq!(
            doc.outer_html(&button),
            "<button class=\"command__btn\" type=\"button\" data-command=\"echo &quot;hi&quot; &amp;&amp; exit\">Copy</button>"
        );
    }

    #[test]
    fn test_text_is_escaped_not_parsed() {
        let mut doc = VirtualDocument::new();
        let p = doc.create_element("p").unwrap();
        doc.set_text(&p, "<script>alert(1)</script> & more");

        assert_eq!(doc.text(&p), "<script>alert(1)</script> & more");
        assert!(doc.children(&p).is_empty());
        assert_eq!(doc.inner_html(&p), "&lt;script&gt;alert(1)&lt;/script&gt; &amp; more");
    }

    #[test]
    fn test_class_list_manipulation() {
        let mut doc = VirtualDocument::new();
        let node = doc.create_element("section").unwrap();
        doc.add_class(&node, "section");
        doc.add_class(&node, "section--collapsed");
        doc.add_class(&node, "section");
        assert_eq!(doc.attribute(&node, "class").as_deref(), Some("section section--collapsed"));

        doc.toggle_class(&node, "section--collapsed", false);
        assert!(!doc.has_class(&node, "section--collapsed"));
        assert!(doc.has_class(&node, "section"));
    }

    #[test]
    fn test_void_elements_have_no_closing_tag() {
        let mut doc = VirtualDocument::new();
        let meta = doc.create_element("meta").unwrap();
        doc.set_attribute(&meta, "name", "theme-color");
        assert_eq!(doc.outer_html(&meta), "<meta name=\"theme-color\">");
    }

    #[test]
    fn test_append_moves_node_and_clear_detaches() {
        let mut doc = VirtualDocument::new();
        let root = doc.document_element();
        let a = doc.create_element("div").unwrap();
        let b = doc.create_element("div").unwrap();
        let child = doc.create_element("span").unwrap();
        doc.append_child(&root, &a);
        doc.append_child(&root, &b);
        doc.append_child(&a, &child);
        doc.append_child(&b, &child);

        assert!(doc.children(&a).is_empty());
        assert_eq!(doc.children(&b), vec![child]);
        assert_eq!(doc.parent(&child), Some(b));

        doc.clear_children(&b);
        assert_eq!(doc.parent(&child), None);
        assert_eq!(doc.inner_html(&b), "");
    }

    #[test]
    fn test_refuses_cycles() {
        let mut doc = VirtualDocument::new();
        let outer = doc.create_element("div").unwrap();
        let inner = doc.create_element("div").unwrap();
        doc.append_child(&outer, &inner);
        doc.append_child(&inner, &outer);
        assert_eq!(doc.parent(&outer), None);
    }

    #[test]
    fn test_element_by_id_only_finds_attached_nodes() {
        let mut doc = VirtualDocument::new();
        let root = doc.document_element();
        let app = doc.create_element("main").unwrap();
        doc.set_attribute(&app, "id", "app");
        assert_eq!(doc.element_by_id("app"), None);

        doc.append_child(&root, &app);
        assert_eq!(doc.element_by_id("app"), Some(app));
    }

    #[test]
    fn test_rejects_invalid_tag() {
        let mut doc = VirtualDocument::new();
        assert!(doc.create_element("not a tag").is_err());
    }
}
