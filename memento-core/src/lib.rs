pub mod accordion;
pub mod content;
pub mod copy;
pub mod dom;
pub mod labels;
pub mod page;
pub mod prerender;
pub mod sections;
pub mod theme;
pub mod timer;
pub mod virtual_dom;

#[cfg(feature = "site")]
pub mod builder;
#[cfg(feature = "site")]
pub mod config;
#[cfg(feature = "site")]
pub mod template;

// Re-export main types
pub use content::{Category, ContentError, ContentModel, Entry};
pub use dom::{Document, DomError, Selector};
pub use labels::Labels;
pub use page::{Click, CopyRequest, Page, PageOptions};
pub use prerender::{PLACEHOLDER, PrerenderError, inject, prerender, prerender_file};
pub use sections::{RenderError, SectionRenderer, render_sections};
pub use theme::{PreferenceStore, THEME_KEY, Theme, ThemeColors};
pub use virtual_dom::VirtualDocument;

#[cfg(feature = "site")]
pub use builder::{BuildError, BuildPaths, Site, SiteBuilder, build_site};
#[cfg(feature = "site")]
pub use template::{TemplateError, TemplateRenderer};
