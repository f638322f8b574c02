use serde::{Deserialize, Serialize};

/// Every user-facing string the renderer and the interaction modules write.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Labels {
    pub copy: CopyLabels,
    pub section: SectionLabels,
    pub theme: ThemeLabels,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct CopyLabels {
    /// Visible text of a copy button at rest.
    pub idle: String,
    /// Visible text while the "copied" feedback is showing.
    pub copied: String,
    pub idle_aria: String,
    pub copied_aria: String,
}

impl Default for CopyLabels {
    fn default() -> Self {
        Self {
            idle: "Copy".to_string(),
            copied: "Copied!".to_string(),
            idle_aria: "Copy the command.".to_string(),
            copied_aria: "The command has been copied.".to_string(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SectionLabels {
    /// Prefix of the screen-reader text on each section toggle, followed by the
    /// category's toggle label.
    pub toggle_prefix: String,
}

impl Default for SectionLabels {
    fn default() -> Self {
        Self {
            toggle_prefix: "Show / hide the section".to_string(),
        }
    }
}

impl SectionLabels {
    pub fn toggle_text(&self, target: &str) -> String {
        format!("{} {}", self.toggle_prefix, target)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ThemeLabels {
    pub switch_to_dark: String,
    pub switch_to_light: String,
}

impl Default for ThemeLabels {
    fn default() -> Self {
        Self {
            switch_to_dark: "Switch to dark theme".to_string(),
            switch_to_light: "Switch to light theme".to_string(),
        }
    }
}
