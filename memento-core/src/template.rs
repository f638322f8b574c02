use std::path::Path;

use serde::Serialize;
use tera::{Context, Tera};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template error: {0}")]
    Tera(#[from] tera::Error),
}

/// Tera templates loaded from a theme directory, plus a context shared by every render.
pub struct TemplateRenderer {
    tera: Tera,
    context: Context,
}

impl TemplateRenderer {
    pub fn new<P: AsRef<Path>>(theme_dir: P) -> Result<Self, TemplateError> {
        let glob = theme_dir.as_ref().join("**").join("*.html");
        let tera = Tera::new(&glob.to_string_lossy())?;

        Ok(Self {
            tera,
            context: Context::new(),
        })
    }

    /// Build from in-memory templates, `(name, source)` pairs.
    pub fn from_templates(templates: &[(&str, &str)]) -> Result<Self, TemplateError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(templates.iter().copied())?;

        Ok(Self {
            tera,
            context: Context::new(),
        })
    }

    pub fn has_template(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|template| template == name)
    }

    /// Add a value to the template context
    pub fn add_to_context<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        self.context.insert(key, value);
    }

    pub fn render(&self, template: &str) -> Result<String, TemplateError> {
        Ok(self.tera.render(template, &self.context)?)
    }
}
