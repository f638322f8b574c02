//! Light/dark theme with a persisted preference.
//!
//! Resolution order: an explicit stored preference, then the system signal.
//! Once the user toggles, the choice is stored and system changes stop
//! mattering.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::dom::{Document, Selector, find_first};
use crate::labels::ThemeLabels;

/// Storage key of the persisted preference.
pub const THEME_KEY: &str = "git-memento-theme";

pub const THEME_ATTR: &str = "data-theme";
pub const THEME_TOGGLE_ATTR: &str = "data-theme-toggle";
pub const THEME_ICON_CLASS: &str = "theme-toggle__icon";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown theme: {0}")]
pub struct UnknownTheme(pub String);

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn opposite(&self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    fn icon(&self) -> &'static str {
        // The icon shows the theme a click switches to.
        match self {
            Theme::Light => "🌙",
            Theme::Dark => "☀️",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = UnknownTheme;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(UnknownTheme(other.to_string())),
        }
    }
}

/// `<meta name="theme-color">` values for each theme.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ThemeColors {
    pub light: String,
    pub dark: String,
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            light: "#f6f8fa".to_string(),
            dark: "#0d1117".to_string(),
        }
    }
}

impl ThemeColors {
    pub fn for_theme(&self, theme: Theme) -> &str {
        match theme {
            Theme::Light => &self.light,
            Theme::Dark => &self.dark,
        }
    }
}

/// String-keyed durable storage, e.g. `localStorage`.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_theme(theme: Theme) -> Self {
        let mut store = Self::new();
        store.set(THEME_KEY, theme.as_str());
        store
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// The stored preference. Anything but the two known values counts as absent.
pub fn stored_theme<S: PreferenceStore + ?Sized>(store: &S) -> Option<Theme> {
    store.get(THEME_KEY)?.parse().ok()
}

pub fn resolve_theme<S: PreferenceStore + ?Sized>(store: &S, system: Theme) -> Theme {
    stored_theme(store).unwrap_or(system)
}

pub struct ThemeToggle<N, S> {
    toggle: N,
    store: S,
    colors: ThemeColors,
    labels: ThemeLabels,
}

impl<N: Clone + PartialEq, S: PreferenceStore> ThemeToggle<N, S> {
    /// Find the toggle control and apply the effective theme. Without a control
    /// there is nothing to wire and `None` is returned.
    pub fn attach<D: Document<Node = N>>(
        doc: &mut D,
        store: S,
        system: Theme,
        colors: ThemeColors,
        labels: ThemeLabels,
    ) -> Option<Self> {
        let root = doc.document_element();
        let Some(toggle) = find_first(doc, &root, Selector::Attribute(THEME_TOGGLE_ATTR)) else {
            debug!("no theme toggle in document");
            return None;
        };

        let module = Self {
            toggle,
            store,
            colors,
            labels,
        };
        let theme = resolve_theme(&module.store, system);
        module.apply(doc, theme);
        Some(module)
    }

    /// The theme currently on the root element. Light when unset.
    pub fn current<D: Document<Node = N>>(&self, doc: &D) -> Theme {
        doc.attribute(&doc.document_element(), THEME_ATTR)
            .and_then(|value| value.parse().ok())
            .unwrap_or(Theme::Light)
    }

    /// User toggle: switch to the opposite theme and persist it.
    pub fn activate<D: Document<Node = N>>(&mut self, doc: &mut D) -> Theme {
        let next = self.current(doc).opposite();
        self.apply(doc, next);
        self.store.set(THEME_KEY, next.as_str());
        debug!(theme = %next, "theme toggled");
        next
    }

    /// System preference changed. Ignored once the user has chosen explicitly.
    pub fn system_changed<D: Document<Node = N>>(&mut self, doc: &mut D, system: Theme) -> Theme {
        if stored_theme(&self.store).is_none() {
            self.apply(doc, system);
        }
        self.current(doc)
    }

    pub fn is_toggle(&self, node: &N) -> bool {
        self.toggle == *node
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn apply<D: Document<Node = N>>(&self, doc: &mut D, theme: Theme) {
        let root = doc.document_element();
        doc.set_attribute(&root, THEME_ATTR, theme.as_str());

        if let Some(icon) = find_first(doc, &self.toggle, Selector::Class(THEME_ICON_CLASS)) {
            doc.set_text(&icon, theme.icon());
        }

        let pressed = if theme == Theme::Dark { "true" } else { "false" };
        let label = match theme {
            Theme::Light => &self.labels.switch_to_dark,
            Theme::Dark => &self.labels.switch_to_light,
        };
        doc.set_attribute(&self.toggle, "aria-pressed", pressed);
        doc.set_attribute(&self.toggle, "aria-label", label);

        let theme_color = Selector::AttributeValue("name", "theme-color");
        if let Some(meta) = find_first(doc, &root, theme_color) {
            doc.set_attribute(&meta, "content", self.colors.for_theme(theme));
        }
    }
}
