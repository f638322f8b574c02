//! Document capability shared by the offline and live documents.
//!
//! The renderer and the interaction modules only ever talk to a [`Document`].
//! At build time that is a [`VirtualDocument`](crate::virtual_dom::VirtualDocument);
//! in the browser it is the live DOM. Nothing here depends on events, layout or
//! timers, so both sides produce the same tree.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("could not create <{tag}>: {reason}")]
    CreateElement { tag: String, reason: String },
}

/// Anything that can build labelled, nested, attribute-bearing nodes and
/// serialize them back to markup.
pub trait Document {
    /// Handle to an element. Cheap to clone; equality is node identity.
    type Node: Clone + PartialEq;

    fn create_element(&mut self, tag: &str) -> Result<Self::Node, DomError>;

    /// The `<html>` element.
    fn document_element(&self) -> Self::Node;

    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    fn tag_name(&self, node: &Self::Node) -> String;

    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn add_class(&mut self, node: &Self::Node, class: &str);

    fn remove_class(&mut self, node: &Self::Node, class: &str);

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    /// Replace all children with a single text node. The text is never parsed.
    fn set_text(&mut self, node: &Self::Node, text: &str);

    fn text(&self, node: &Self::Node) -> String;

    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node);

    fn clear_children(&mut self, node: &Self::Node);

    /// Element children only, in document order.
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    fn inner_html(&self, node: &Self::Node) -> String;

    fn toggle_class(&mut self, node: &Self::Node, class: &str, on: bool) {
        if on {
            self.add_class(node, class);
        } else {
            self.remove_class(node, class);
        }
    }
}

/// The handful of selectors the runtime needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector<'a> {
    Tag(&'a str),
    Class(&'a str),
    Attribute(&'a str),
    AttributeValue(&'a str, &'a str),
}

impl Selector<'_> {
    pub fn matches<D: Document>(&self, doc: &D, node: &D::Node) -> bool {
        match *self {
            Selector::Tag(tag) => doc.tag_name(node).eq_ignore_ascii_case(tag),
            Selector::Class(class) => doc.has_class(node, class),
            Selector::Attribute(name) => doc.attribute(node, name).is_some(),
            Selector::AttributeValue(name, value) => {
                doc.attribute(node, name).as_deref() == Some(value)
            }
        }
    }
}

/// Nearest inclusive ancestor matching `selector`.
pub fn closest<D: Document>(doc: &D, node: &D::Node, selector: Selector<'_>) -> Option<D::Node> {
    let mut current = Some(node.clone());
    while let Some(candidate) = current {
        if selector.matches(doc, &candidate) {
            return Some(candidate);
        }
        current = doc.parent(&candidate);
    }
    None
}

/// First matching descendant of `root` in document order.
pub fn find_first<D: Document>(doc: &D, root: &D::Node, selector: Selector<'_>) -> Option<D::Node> {
    let mut stack: Vec<D::Node> = doc.children(root).into_iter().rev().collect();
    while let Some(node) = stack.pop() {
        if selector.matches(doc, &node) {
            return Some(node);
        }
        stack.extend(doc.children(&node).into_iter().rev());
    }
    None
}

/// Every matching descendant of `root` in document order.
pub fn find_all<D: Document>(doc: &D, root: &D::Node, selector: Selector<'_>) -> Vec<D::Node> {
    let mut found = Vec::new();
    let mut stack: Vec<D::Node> = doc.children(root).into_iter().rev().collect();
    while let Some(node) = stack.pop() {
        if selector.matches(doc, &node) {
            found.push(node.clone());
        }
        stack.extend(doc.children(&node).into_iter().rev());
    }
    found
}
