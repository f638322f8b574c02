//! Section renderer.
//!
//! Turns the content model into one accessible `<section>` per category. The
//! same code runs against the build-time [`VirtualDocument`] and the live
//! browser document, so the output structure is identical in both places.
//!
//! [`VirtualDocument`]: crate::virtual_dom::VirtualDocument

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::content::{Category, ContentError, ContentModel, Entry};
use crate::dom::{Document, DomError};
use crate::labels::Labels;

/// Id of the conventional render target.
pub const APP_CONTAINER_ID: &str = "app";

pub const SECTION_CLASS: &str = "section";
pub const SECTION_COLLAPSED_CLASS: &str = "section--collapsed";
pub const SECTION_TOGGLE_CLASS: &str = "section__toggle";
pub const SECTION_CONTENT_CLASS: &str = "commands";
pub const CARD_CLASS: &str = "command";
pub const COPY_TRIGGER_CLASS: &str = "command__btn";
/// Attribute carrying the literal payload of a copy trigger.
pub const COPY_PAYLOAD_ATTR: &str = "data-command";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    Dom(#[from] DomError),
}

pub struct SectionRenderer<'a> {
    labels: &'a Labels,
}

impl<'a> SectionRenderer<'a> {
    pub fn new(labels: &'a Labels) -> Self {
        Self { labels }
    }

    /// Replace the contents of `container` with one section per category, in order.
    pub fn render<D: Document>(
        &self,
        doc: &mut D,
        container: &D::Node,
        categories: &[Category],
    ) -> Result<(), RenderError> {
        // Build every section detached first so a failure leaves the container untouched.
        let mut sections = Vec::with_capacity(categories.len());
        for category in categories {
            sections.push(self.section(doc, category)?);
        }

        doc.clear_children(container);
        for section in &sections {
            doc.append_child(container, section);
        }

        debug!(sections = sections.len(), "rendered sections");
        Ok(())
    }

    /// Validate a raw JSON content model, then render it.
    ///
    /// Anything other than a JSON array is rejected before the container is touched.
    pub fn render_json<D: Document>(
        &self,
        doc: &mut D,
        container: &D::Node,
        data: Value,
    ) -> Result<(), RenderError> {
        let model = ContentModel::from_value(data)?;
        self.render(doc, container, model.categories())
    }

    /// Render into `#app`. A document without one is left alone.
    pub fn render_into_app<D: Document>(
        &self,
        doc: &mut D,
        categories: &[Category],
    ) -> Result<bool, RenderError> {
        let Some(container) = doc.element_by_id(APP_CONTAINER_ID) else {
            warn!("no #{APP_CONTAINER_ID} container in document, skipping render");
            return Ok(false);
        };
        self.render(doc, &container, categories)?;
        Ok(true)
    }

    fn section<D: Document>(
        &self,
        doc: &mut D,
        category: &Category,
    ) -> Result<D::Node, RenderError> {
        let section = doc.create_element("section")?;
        doc.set_attribute(&section, "class", SECTION_CLASS);
        doc.set_attribute(&section, "aria-labelledby", &category.heading_id());

        let header = self.header(doc, category)?;
        doc.append_child(&section, &header);

        let content = doc.create_element("div")?;
        doc.set_attribute(&content, "class", SECTION_CONTENT_CLASS);
        doc.set_attribute(&content, "id", &category.content_id());
        for entry in &category.entries {
            let card = self.card(doc, entry)?;
            doc.append_child(&content, &card);
        }
        doc.append_child(&section, &content);

        Ok(section)
    }

    fn header<D: Document>(
        &self,
        doc: &mut D,
        category: &Category,
    ) -> Result<D::Node, RenderError> {
        let header = doc.create_element("div")?;
        doc.set_attribute(&header, "class", "section__header");

        let icon = decorative_icon(doc, &format!("{} section__icon", category.icon))?;
        doc.append_child(&header, &icon);

        let title = doc.create_element("h2")?;
        doc.set_attribute(&title, "class", "section__title");
        doc.set_attribute(&title, "id", &category.heading_id());
        doc.set_text(&title, &category.title);
        doc.append_child(&header, &title);

        let toggle = doc.create_element("button")?;
        doc.set_attribute(&toggle, "class", SECTION_TOGGLE_CLASS);
        doc.set_attribute(&toggle, "type", "button");
        doc.set_attribute(&toggle, "aria-expanded", "true");
        doc.set_attribute(&toggle, "aria-controls", &category.content_id());

        let hidden = doc.create_element("span")?;
        doc.set_attribute(&hidden, "class", "visually-hidden");
        doc.set_text(
            &hidden,
            &self.labels.section.toggle_text(category.toggle_label()),
        );
        doc.append_child(&toggle, &hidden);

        let chevron = decorative_icon(doc, "fas fa-chevron-down section__toggle-icon")?;
        doc.append_child(&toggle, &chevron);
        doc.append_child(&header, &toggle);

        Ok(header)
    }

    fn card<D: Document>(&self, doc: &mut D, entry: &Entry) -> Result<D::Node, RenderError> {
        let card = doc.create_element("article")?;
        doc.set_attribute(&card, "class", CARD_CLASS);

        let info = doc.create_element("div")?;
        doc.set_attribute(&info, "class", "command__info");

        let description = doc.create_element("p")?;
        doc.set_attribute(&description, "class", "command__description");
        doc.set_text(&description, &entry.description);
        doc.append_child(&info, &description);

        let code = doc.create_element("code")?;
        doc.set_attribute(&code, "class", "command__code");
        doc.set_text(&code, &entry.value);
        doc.append_child(&info, &code);
        doc.append_child(&card, &info);

        let button = doc.create_element("button")?;
        doc.set_attribute(&button, "class", COPY_TRIGGER_CLASS);
        doc.set_attribute(&button, "type", "button");
        doc.set_attribute(&button, COPY_PAYLOAD_ATTR, &entry.value);
        doc.set_attribute(&button, "aria-label", &self.labels.copy.idle_aria);

        let icon = decorative_icon(doc, "fas fa-clipboard")?;
        doc.append_child(&button, &icon);

        let label = doc.create_element("span")?;
        doc.set_text(&label, &self.labels.copy.idle);
        doc.append_child(&button, &label);
        doc.append_child(&card, &button);

        Ok(card)
    }
}

fn decorative_icon<D: Document>(doc: &mut D, classes: &str) -> Result<D::Node, RenderError> {
    let icon = doc.create_element("i")?;
    doc.set_attribute(&icon, "class", classes);
    doc.set_attribute(&icon, "aria-hidden", "true");
    Ok(icon)
}

/// Render with the default labels.
pub fn render_sections<D: Document>(
    doc: &mut D,
    container: &D::Node,
    categories: &[Category],
) -> Result<(), RenderError> {
    let labels = Labels::default();
    SectionRenderer::new(&labels).render(doc, container, categories)
}
