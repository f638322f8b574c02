use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::{Config, SiteConfig};
use crate::content::{ContentError, ContentModel};
use crate::labels::Labels;
use crate::page::PageOptions;
use crate::prerender::{PrerenderError, inject, prerender};
use crate::template::{TemplateError, TemplateRenderer};

/// Template every theme must provide.
pub const INDEX_TEMPLATE: &str = "index.html";

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Data file not specified")]
    MissingDataFile,
    #[error("Invalid path: {}", .0.display())]
    InvalidPath(PathBuf),
    #[error("Theme has no index.html template")]
    MissingIndexTemplate,
    #[error("Content error: {0}")]
    Content(#[from] ContentError),
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),
    #[error("Prerender error: {0}")]
    Prerender(#[from] PrerenderError),
    #[error("Page options error: {0}")]
    Options(#[from] serde_json::Error),
    #[error("Asset copy error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where the build reads from and writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPaths {
    pub data: PathBuf,
    pub theme: PathBuf,
    pub public: PathBuf,
    pub output: PathBuf,
}

impl Default for BuildPaths {
    fn default() -> Self {
        Self {
            data: PathBuf::from("./data/commands.json"),
            theme: PathBuf::from("./theme"),
            public: PathBuf::from("./public"),
            output: PathBuf::from("./out"),
        }
    }
}

pub struct SiteBuilder {
    data_file: Option<PathBuf>,
    theme_dir: PathBuf,
    public_dir: PathBuf,
    output_dir: PathBuf,
    site: SiteConfig,
    labels: Labels,
}

impl Default for SiteBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteBuilder {
    pub fn new() -> Self {
        let defaults = BuildPaths::default();
        Self {
            data_file: None,
            theme_dir: defaults.theme,
            public_dir: defaults.public,
            output_dir: defaults.output,
            site: SiteConfig::default(),
            labels: Labels::default(),
        }
    }

    // Required configuration
    pub fn data_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.data_file = Some(path.as_ref().to_path_buf());
        self
    }

    // Optional paths
    pub fn theme_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.theme_dir = path.as_ref().to_path_buf();
        self
    }

    pub fn public_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.public_dir = path.as_ref().to_path_buf();
        self
    }

    pub fn output_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_dir = path.as_ref().to_path_buf();
        self
    }

    // Context configuration
    pub fn site_config(mut self, config: SiteConfig) -> Self {
        self.site = config;
        self
    }

    pub fn labels(mut self, labels: Labels) -> Self {
        self.labels = labels;
        self
    }

    /// Load content and templates. Nothing is written until [`Site::render_all`].
    pub fn build(self) -> Result<Site, BuildError> {
        let data_file = self.data_file.ok_or(BuildError::MissingDataFile)?;
        if !data_file.is_file() {
            return Err(BuildError::InvalidPath(data_file));
        }
        if !self.theme_dir.is_dir() {
            return Err(BuildError::InvalidPath(self.theme_dir));
        }

        let content = ContentModel::read(&data_file)?;
        debug!("loaded {} categories from {}", content.len(), data_file.display());

        let mut renderer = TemplateRenderer::new(&self.theme_dir)?;
        if !renderer.has_template(INDEX_TEMPLATE) {
            return Err(BuildError::MissingIndexTemplate);
        }
        renderer.add_to_context("site", &self.site);
        renderer.add_to_context("labels", &self.labels);
        renderer.add_to_context("categories", content.categories());

        let options = PageOptions {
            labels: self.labels.clone(),
            colors: self.site.theme_colors.clone(),
        };
        renderer.add_to_context("options_json", &options.to_script_json()?);

        Ok(Site {
            content,
            renderer,
            labels: self.labels,
            public_dir: self.public_dir,
            output_dir: self.output_dir,
        })
    }
}

pub struct Site {
    content: ContentModel,
    renderer: TemplateRenderer,
    labels: Labels,
    public_dir: PathBuf,
    output_dir: PathBuf,
}

impl Site {
    pub fn content(&self) -> &ContentModel {
        &self.content
    }

    /// The shipped document: the theme's index template with the sections prerendered in.
    pub fn render_index(&self) -> Result<String, BuildError> {
        let document = self.renderer.render(INDEX_TEMPLATE)?;
        let sections = prerender(self.content.categories(), &self.labels)?;
        Ok(inject(&document, &sections)?)
    }

    pub fn render_all(&self) -> Result<PathBuf, BuildError> {
        // Render before touching the output so a failed build leaves no partial site.
        let html = self.render_index()?;

        std::fs::create_dir_all(&self.output_dir)?;
        let copied = self.copy_public()?;

        let index = self.output_dir.join(INDEX_TEMPLATE);
        std::fs::write(&index, html)?;

        info!(
            "wrote {} ({} sections, {} assets)",
            index.display(),
            self.content.len(),
            copied
        );
        Ok(index)
    }

    fn copy_public(&self) -> Result<usize, BuildError> {
        if !self.public_dir.is_dir() {
            debug!("no public directory at {}", self.public_dir.display());
            return Ok(0);
        }

        let mut copied = 0;
        for entry in WalkDir::new(&self.public_dir) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(&self.public_dir)
                .map_err(|_| BuildError::InvalidPath(entry.path().to_path_buf()))?;
            let target = self.output_dir.join(relative);
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(entry.path(), &target)?;
            copied += 1;
        }

        Ok(copied)
    }
}

/// Build the whole site from a config and a set of paths.
pub fn build_site(config: &Config, paths: &BuildPaths) -> Result<PathBuf, BuildError> {
    let site = SiteBuilder::new()
        .data_file(&paths.data)
        .theme_dir(&paths.theme)
        .public_dir(&paths.public)
        .output_dir(&paths.output)
        .site_config(config.site())
        .labels(config.labels())
        .build()?;

    site.render_all()
}
