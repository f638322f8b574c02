use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::labels::Labels;
use crate::theme::ThemeColors;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parsing(#[from] toml::de::Error),
}

#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct Config {
    pub site: Option<SiteConfig>,
    pub labels: Option<Labels>,
}

impl Config {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&data)?;

        Ok(config)
    }

    pub fn site(&self) -> SiteConfig {
        self.site.clone().unwrap_or_default()
    }

    pub fn labels(&self) -> Labels {
        self.labels.clone().unwrap_or_default()
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SiteConfig {
    pub title: String,
    pub tagline: Option<String>,
    pub description: Option<String>,
    pub lang: String,
    pub theme_colors: ThemeColors,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Git Memento".into(),
            tagline: Some(
                "The Git commands you keep looking up, one click from your clipboard".to_string(),
            ),
            description: None,
            lang: "en".to_string(),
            theme_colors: ThemeColors::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: Config = toml::from_str(indoc! {r#"
            [site]
            title = "Mémento Git"
            lang = "fr"

            [labels.copy]
            idle = "Copier"
            copied = "Copié !"
        "#})
        .unwrap();

        let site = config.site();
        assert_eq!(site.title, "Mémento Git");
        assert_eq!(site.lang, "fr");
        assert_eq!(site.theme_colors, ThemeColors::default());

        let labels = config.labels();
        assert_eq!(labels.copy.idle, "Copier");
        assert_eq!(labels.copy.copied, "Copié !");
        assert_eq!(labels.copy.idle_aria, "Copy the command.");
        assert_eq!(labels.section, Default::default());
    }

    #[test]
    fn test_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.site().title, "Git Memento");
    }
}
