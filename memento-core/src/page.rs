//! Page runtime.
//!
//! On load, renders the sections unless the build already prerendered them,
//! then attaches the copy, accordion and theme modules. Afterwards the host
//! forwards clicks, system theme changes and clock ticks. Each module is
//! independent: a missing control only disables its own module.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::accordion::Accordion;
use crate::content::Category;
use crate::copy::{Clipboard, ClipboardError, CopyFeedback};
use crate::dom::{Document, Selector, closest};
use crate::labels::Labels;
use crate::sections::{
    APP_CONTAINER_ID, COPY_TRIGGER_CLASS, RenderError, SECTION_TOGGLE_CLASS, SectionRenderer,
};
use crate::theme::{PreferenceStore, THEME_TOGGLE_ATTR, Theme, ThemeColors, ThemeToggle};

/// Id of the `<script type="application/json">` element the build fills with [`PageOptions`].
pub const OPTIONS_ELEMENT_ID: &str = "memento-options";

/// Strings and colours the runtime needs after load. The build embeds them in
/// the page so the browser uses the same configuration as the prerender.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct PageOptions {
    pub labels: Labels,
    pub colors: ThemeColors,
}

impl PageOptions {
    /// JSON safe to place inside a `<script>` element.
    pub fn to_script_json(&self) -> Result<String, serde_json::Error> {
        Ok(serde_json::to_string(self)?.replace("</", "<\\/"))
    }

    /// Options embedded in `doc`. Missing or malformed options fall back to the defaults.
    pub fn from_document<D: Document>(doc: &D) -> Self {
        let Some(script) = doc.element_by_id(OPTIONS_ELEMENT_ID) else {
            debug!("no #{OPTIONS_ELEMENT_ID} element, using default options");
            return Self::default();
        };

        match serde_json::from_str(&doc.text(&script)) {
            Ok(options) => options,
            Err(e) => {
                warn!("ignoring malformed page options: {e}");
                Self::default()
            }
        }
    }
}

/// A copy the host must perform, then report back through [`Page::complete_copy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyRequest<N> {
    pub trigger: N,
    pub payload: String,
}

/// What a click did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Click<N> {
    Copy(CopyRequest<N>),
    Section { expanded: bool },
    Theme(Theme),
    Ignored,
}

pub struct Page<D: Document, S> {
    doc: D,
    copy: CopyFeedback<D::Node>,
    accordion: Accordion<D::Node>,
    theme: Option<ThemeToggle<D::Node, S>>,
}

impl<D: Document, S: PreferenceStore> Page<D, S> {
    pub fn load(
        mut doc: D,
        categories: &[Category],
        store: S,
        system: Theme,
        options: PageOptions,
    ) -> Result<Self, RenderError> {
        match doc.element_by_id(APP_CONTAINER_ID) {
            Some(app) if doc.children(&app).is_empty() => {
                SectionRenderer::new(&options.labels).render(&mut doc, &app, categories)?;
                info!(sections = categories.len(), "rendered sections on load");
            }
            Some(_) => debug!("sections already prerendered"),
            None => debug!("no #{APP_CONTAINER_ID} container, nothing to render"),
        }

        let copy = CopyFeedback::new(options.labels.copy.clone());
        debug!(triggers = copy.triggers(&doc).len(), "copy feedback attached");
        let accordion = Accordion::attach(&mut doc);
        let theme = ThemeToggle::attach(
            &mut doc,
            store,
            system,
            options.colors,
            options.labels.theme,
        );

        Ok(Self {
            doc,
            copy,
            accordion,
            theme,
        })
    }

    pub fn document(&self) -> &D {
        &self.doc
    }

    /// Route a click on `target` (or any of its descendants) to the owning module.
    pub fn click(&mut self, target: &D::Node) -> Click<D::Node> {
        if let Some(trigger) = closest(&self.doc, target, Selector::Class(COPY_TRIGGER_CLASS)) {
            return match self.copy.payload(&self.doc, &trigger) {
                Some(payload) => Click::Copy(CopyRequest { trigger, payload }),
                None => Click::Ignored,
            };
        }

        if let Some(toggle) = closest(&self.doc, target, Selector::Class(SECTION_TOGGLE_CLASS)) {
            return match self.accordion.toggle(&mut self.doc, &toggle) {
                Some(expanded) => Click::Section { expanded },
                None => Click::Ignored,
            };
        }

        if let Some(toggle) = closest(&self.doc, target, Selector::Attribute(THEME_TOGGLE_ATTR)) {
            if let Some(theme) = self.theme.as_mut().filter(|theme| theme.is_toggle(&toggle)) {
                return Click::Theme(theme.activate(&mut self.doc));
            }
        }

        Click::Ignored
    }

    /// Report the outcome of a clipboard write started for `request`.
    pub fn complete_copy(
        &mut self,
        request: &CopyRequest<D::Node>,
        result: Result<(), ClipboardError>,
        now: Duration,
    ) {
        match result {
            Ok(()) => self.copy.copied(&mut self.doc, &request.trigger, now),
            Err(err) => self.copy.failed(&err),
        }
    }

    /// Click with a synchronous clipboard: performs the copy in the same turn.
    pub fn click_with<C: Clipboard + ?Sized>(
        &mut self,
        target: &D::Node,
        clipboard: &mut C,
        now: Duration,
    ) -> Click<D::Node> {
        let click = self.click(target);
        if let Click::Copy(request) = &click {
            let result = clipboard.write_text(&request.payload);
            self.complete_copy(request, result, now);
        }
        click
    }

    pub fn system_theme_changed(&mut self, system: Theme) -> Option<Theme> {
        let theme = self.theme.as_mut()?;
        Some(theme.system_changed(&mut self.doc, system))
    }

    /// Fire every revert whose time has come.
    pub fn advance(&mut self, now: Duration) -> usize {
        self.copy.tick(&mut self.doc, now)
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.copy.next_deadline()
    }

    pub fn is_copied(&self, trigger: &D::Node) -> bool {
        self.copy.is_copied(trigger)
    }

    pub fn has_theme_toggle(&self) -> bool {
        self.theme.is_some()
    }

    /// The preference store, while a theme toggle is attached.
    pub fn preferences(&self) -> Option<&S> {
        self.theme.as_ref().map(|theme| theme.store())
    }

    pub fn into_document(self) -> D {
        self.doc
    }
}
