//! The live DOM behind the [`Document`] capability.

use memento_core::{Document, DomError};
use tracing::warn;
use web_sys::Element;

pub struct WebDocument {
    document: web_sys::Document,
    root: Element,
}

impl WebDocument {
    /// `None` when the document has no `<html>` element.
    pub fn new(document: web_sys::Document) -> Option<Self> {
        let root = document.document_element()?;
        Some(Self { document, root })
    }
}

impl Document for WebDocument {
    type Node = Element;

    fn create_element(&mut self, tag: &str) -> Result<Element, DomError> {
        self.document
            .create_element(tag)
            .map_err(|e| DomError::CreateElement {
                tag: tag.to_string(),
                reason: format!("{e:?}"),
            })
    }

    fn document_element(&self) -> Element {
        self.root.clone()
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn tag_name(&self, node: &Element) -> String {
        node.tag_name().to_ascii_lowercase()
    }

    fn set_attribute(&mut self, node: &Element, name: &str, value: &str) {
        if let Err(e) = node.set_attribute(name, value) {
            warn!("could not set {name}: {e:?}");
        }
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn add_class(&mut self, node: &Element, class: &str) {
        if let Err(e) = node.class_list().add_1(class) {
            warn!("could not add class {class}: {e:?}");
        }
    }

    fn remove_class(&mut self, node: &Element, class: &str) {
        if let Err(e) = node.class_list().remove_1(class) {
            warn!("could not remove class {class}: {e:?}");
        }
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn set_text(&mut self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn text(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn append_child(&mut self, parent: &Element, child: &Element) {
        if let Err(e) = parent.append_child(child) {
            warn!("could not append <{}>: {e:?}", self.tag_name(child));
        }
    }

    fn clear_children(&mut self, node: &Element) {
        while let Some(child) = node.first_child() {
            if node.remove_child(&child).is_err() {
                break;
            }
        }
    }

    fn children(&self, node: &Element) -> Vec<Element> {
        let children = node.children();
        (0..children.length())
            .filter_map(|index| children.item(index))
            .collect()
    }

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn inner_html(&self, node: &Element) -> String {
        node.inner_html()
    }
}
