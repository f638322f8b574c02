//! Build-time prerendering.
//!
//! Runs the section renderer against a [`VirtualDocument`], then splices the
//! markup into the shipped document in place of [`PLACEHOLDER`]. A document
//! without the marker, or an empty render, fails the build.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::content::Category;
use crate::dom::Document;
use crate::labels::Labels;
use crate::sections::{APP_CONTAINER_ID, RenderError, SectionRenderer};
use crate::virtual_dom::VirtualDocument;

/// Injection point in the shipped document. Only the first occurrence is replaced.
pub const PLACEHOLDER: &str = "<!--app-html-->";

#[derive(Debug, Error)]
pub enum PrerenderError {
    #[error("placeholder \"<!--app-html-->\" not found in {0}")]
    MissingPlaceholder(String),
    #[error("prerendered HTML is empty, check the content data")]
    EmptyOutput,
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Render the sections offline and return the container's inner HTML.
pub fn prerender(categories: &[Category], labels: &Labels) -> Result<String, PrerenderError> {
    let mut doc = VirtualDocument::new();
    let app = doc.create_element("div").map_err(RenderError::from)?;
    doc.set_attribute(&app, "id", APP_CONTAINER_ID);

    SectionRenderer::new(labels).render(&mut doc, &app, categories)?;

    let html = doc.inner_html(&app);
    if html.trim().is_empty() {
        return Err(PrerenderError::EmptyOutput);
    }
    Ok(html)
}

/// Replace the first placeholder in `document` with `html`.
pub fn inject(document: &str, html: &str) -> Result<String, PrerenderError> {
    if !document.contains(PLACEHOLDER) {
        return Err(PrerenderError::MissingPlaceholder("document".to_string()));
    }
    if html.trim().is_empty() {
        return Err(PrerenderError::EmptyOutput);
    }
    Ok(document.replacen(PLACEHOLDER, html, 1))
}

/// Prerender and inject into the file at `path`, in place.
pub fn prerender_file<P: AsRef<Path>>(
    path: P,
    categories: &[Category],
    labels: &Labels,
) -> Result<(), PrerenderError> {
    let path = path.as_ref();
    let io_error = |source: std::io::Error| PrerenderError::Io {
        path: path.to_path_buf(),
        source,
    };

    let document = std::fs::read_to_string(path).map_err(io_error)?;
    if !document.contains(PLACEHOLDER) {
        return Err(PrerenderError::MissingPlaceholder(path.display().to_string()));
    }

    let html = prerender(categories, labels)?;
    let out = inject(&document, &html)?;
    std::fs::write(path, out).map_err(io_error)?;

    info!("prerendered {} sections into {}", categories.len(), path.display());
    Ok(())
}
