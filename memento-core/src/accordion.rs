use tracing::debug;

use crate::dom::{Document, Selector, find_all, find_first};
use crate::sections::{
    SECTION_CLASS, SECTION_COLLAPSED_CLASS, SECTION_CONTENT_CLASS, SECTION_TOGGLE_CLASS,
};

#[derive(Debug)]
struct SectionState<N> {
    section: N,
    toggle: N,
    expanded: bool,
}

/// Expand/collapse state for every section that has a toggle and a content region.
#[derive(Debug)]
pub struct Accordion<N> {
    sections: Vec<SectionState<N>>,
}

impl<N: Clone + PartialEq> Accordion<N> {
    /// Initial state comes from the markup: a section is expanded unless it
    /// already carries the collapsed marker.
    pub fn attach<D: Document<Node = N>>(doc: &mut D) -> Self {
        let root = doc.document_element();
        let mut sections = Vec::new();

        for section in find_all(doc, &root, Selector::Class(SECTION_CLASS)) {
            let toggle = find_first(doc, &section, Selector::Class(SECTION_TOGGLE_CLASS));
            let content = find_first(doc, &section, Selector::Class(SECTION_CONTENT_CLASS));
            let (Some(toggle), Some(_)) = (toggle, content) else {
                continue;
            };

            let expanded = !doc.has_class(&section, SECTION_COLLAPSED_CLASS);
            doc.set_attribute(&toggle, "aria-expanded", bool_attr(expanded));
            sections.push(SectionState {
                section,
                toggle,
                expanded,
            });
        }

        debug!(sections = sections.len(), "accordion attached");
        Self { sections }
    }

    /// Flip the section owning `toggle`. Returns the new state, or `None` for an unknown toggle.
    pub fn toggle<D: Document<Node = N>>(&mut self, doc: &mut D, toggle: &N) -> Option<bool> {
        let state = self.sections.iter_mut().find(|s| s.toggle == *toggle)?;
        state.expanded = !state.expanded;

        doc.toggle_class(&state.section, SECTION_COLLAPSED_CLASS, !state.expanded);
        doc.set_attribute(&state.toggle, "aria-expanded", bool_attr(state.expanded));
        Some(state.expanded)
    }

    pub fn is_expanded(&self, section: &N) -> Option<bool> {
        self.sections
            .iter()
            .find(|s| s.section == *section)
            .map(|s| s.expanded)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

fn bool_attr(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Category;
    use crate::sections::render_sections;
    use crate::virtual_dom::{NodeId, VirtualDocument};

    fn rendered(ids: &[&str]) -> (VirtualDocument, Vec<NodeId>) {
        let mut doc = VirtualDocument::new();
        let root = doc.document_element();
        let app = doc.create_element("main").unwrap();
        doc.append_child(&root, &app);
        let categories: Vec<Category> = ids
            .iter()
            .map(|id| Category {
                id: id.to_string(),
                icon: "fas fa-folder".to_string(),
                title: id.to_string(),
                toggle_label: None,
                entries: Vec::new(),
            })
            .collect();
        render_sections(&mut doc, &app, &categories).unwrap();
        let sections = doc.children(&app);
        (doc, sections)
    }

    fn toggle_of(doc: &VirtualDocument, section: &NodeId) -> NodeId {
        find_first(doc, section, Selector::Class(SECTION_TOGGLE_CLASS)).unwrap()
    }

    #[test]
    fn test_toggle_twice_restores_state() {
        let (mut doc, sections) = rendered(&["a"]);
        let mut accordion = Accordion::attach(&mut doc);
        let toggle = toggle_of(&doc, &sections[0]);
        let before_class = doc.attribute(&sections[0], "class");

        assert_eq!(accordion.toggle(&mut doc, &toggle), Some(false));
        assert!(doc.has_class(&sections[0], SECTION_COLLAPSED_CLASS));
        assert_eq!(doc.attribute(&toggle, "aria-expanded").as_deref(), Some("false"));

        assert_eq!(accordion.toggle(&mut doc, &toggle), Some(true));
        assert_eq!(doc.attribute(&sections[0], "class"), before_class);
        assert_eq!(doc.attribute(&toggle, "aria-expanded").as_deref(), Some("true"));
    }

    #[test]
    fn test_sections_toggle_independently() {
        let (mut doc, sections) = rendered(&["a", "b"]);
        let mut accordion = Accordion::attach(&mut doc);
        let toggle = toggle_of(&doc, &sections[1]);

        accordion.toggle(&mut doc, &toggle);

        assert_eq!(accordion.is_expanded(&sections[0]), Some(true));
        assert_eq!(accordion.is_expanded(&sections[1]), Some(false));
        assert!(!doc.has_class(&sections[0], SECTION_COLLAPSED_CLASS));
    }

    #[test]
    fn test_prerendered_collapsed_marker_sets_initial_state() {
        let (mut doc, sections) = rendered(&["a"]);
        doc.add_class(&sections[0], SECTION_COLLAPSED_CLASS);

        let mut accordion = Accordion::attach(&mut doc);
        let toggle = toggle_of(&doc, &sections[0]);

        assert_eq!(accordion.is_expanded(&sections[0]), Some(false));
        assert_eq!(doc.attribute(&toggle, "aria-expanded").as_deref(), Some("false"));
        assert_eq!(accordion.toggle(&mut doc, &toggle), Some(true));
        assert!(!doc.has_class(&sections[0], SECTION_COLLAPSED_CLASS));
    }

    #[test]
    fn test_skips_sections_missing_parts() {
        let mut doc = VirtualDocument::new();
        let root = doc.document_element();
        let section = doc.create_element("section").unwrap();
        doc.add_class(&section, SECTION_CLASS);
        doc.append_child(&root, &section);

        let mut accordion = Accordion::attach(&mut doc);
        assert!(accordion.is_empty());
        assert_eq!(accordion.toggle(&mut doc, &section), None);
    }
}
