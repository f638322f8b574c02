use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("content model must be an ordered sequence of categories, found {found}")]
    NotASequence { found: &'static str },
    #[error("malformed content model: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("duplicate category id: {0}")]
    DuplicateId(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A titled group of entries, rendered as one collapsible section.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub icon: String,
    pub title: String,
    #[serde(rename = "toggleLabel", default, skip_serializing_if = "Option::is_none")]
    pub toggle_label: Option<String>,
    #[serde(alias = "commands", default)]
    pub entries: Vec<Entry>,
}

impl Category {
    /// Label used by the section toggle. Falls back to the title when unset or empty.
    pub fn toggle_label(&self) -> &str {
        match self.toggle_label.as_deref() {
            Some(label) if !label.is_empty() => label,
            _ => &self.title,
        }
    }

    pub fn heading_id(&self) -> String {
        format!("section-{}", self.id)
    }

    pub fn content_id(&self) -> String {
        format!("section-{}-content", self.id)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub description: String,
    #[serde(alias = "code")]
    pub value: String,
}

/// The ordered, validated list of categories the site is built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentModel {
    categories: Vec<Category>,
}

impl ContentModel {
    pub fn new(categories: Vec<Category>) -> Result<Self, ContentError> {
        let mut seen = HashSet::new();
        for category in &categories {
            if !seen.insert(category.id.as_str()) {
                return Err(ContentError::DuplicateId(category.id.clone()));
            }
        }

        Ok(Self { categories })
    }

    pub fn from_value(value: Value) -> Result<Self, ContentError> {
        let found = match &value {
            Value::Array(_) => None,
            Value::Null => Some("null"),
            Value::Bool(_) => Some("a boolean"),
            Value::Number(_) => Some("a number"),
            Value::String(_) => Some("a string"),
            Value::Object(_) => Some("an object"),
        };
        if let Some(found) = found {
            return Err(ContentError::NotASequence { found });
        }

        let categories: Vec<Category> = serde_json::from_value(value)?;
        Self::new(categories)
    }

    pub fn from_json(data: &str) -> Result<Self, ContentError> {
        let value: Value = serde_json::from_str(data)?;
        Self::from_value(value)
    }

    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, ContentError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
