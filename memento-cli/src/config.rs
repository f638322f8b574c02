use anyhow::Result;
use clap::ArgMatches;
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use memento_core::BuildPaths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_CONFIG_FILE: &str = "./memento.toml";

/// Complete configuration that merges CLI args, env vars, config files, and defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MementoConfig {
    /// Build configuration
    pub build: BuildConfig,
    /// Site configuration (from memento-core)
    #[serde(flatten)]
    pub site: memento_core::config::Config,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BuildConfig {
    /// Category data file
    pub data: String,
    /// Theme directory holding index.html
    pub theme: String,
    /// Static assets copied verbatim
    pub public: String,
    /// Output directory for generated site
    pub output: String,
    /// Configuration file path
    pub config: String,
    /// Quiet period before a watched change triggers a rebuild
    pub debounce_ms: u64,
}

impl Default for BuildConfig {
    fn default() -> Self {
        let paths = BuildPaths::default();
        Self {
            data: paths.data.display().to_string(),
            theme: paths.theme.display().to_string(),
            public: paths.public.display().to_string(),
            output: paths.output.display().to_string(),
            config: DEFAULT_CONFIG_FILE.to_string(),
            debounce_ms: 500,
        }
    }
}

impl BuildConfig {
    pub fn paths(&self) -> BuildPaths {
        BuildPaths {
            data: PathBuf::from(&self.data),
            theme: PathBuf::from(&self.theme),
            public: PathBuf::from(&self.public),
            output: PathBuf::from(&self.output),
        }
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl MementoConfig {
    /// Load configuration with cascading precedence:
    /// 1. CLI arguments (highest priority)
    /// 2. Environment variables (MEMENTO_*)
    /// 3. Configuration file
    /// 4. Defaults (lowest priority)
    pub fn load(args: &ArgMatches) -> Result<Self> {
        let config_file = args
            .try_get_one::<String>("config")
            .unwrap_or(None)
            .cloned()
            .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());

        let mut builder = ConfigBuilder::builder();

        // 1. Start with defaults
        builder = builder.add_source(ConfigBuilder::try_from(&Self::default())?);

        // 2. Add configuration file if it exists
        if Path::new(&config_file).exists() {
            debug!("reading configuration from {config_file}");
            builder = builder.add_source(File::new(&config_file, FileFormat::Toml));
        }

        // 3. Add environment variables with MEMENTO_ prefix
        builder = builder.add_source(
            Environment::with_prefix("MEMENTO")
                .prefix_separator("_")
                .separator("__"), // Use double underscore for nested keys
        );

        // 4. Override with CLI arguments that are defined for this command
        for key in ["data", "theme", "public", "output", "config", "debounce_ms"] {
            if let Some(value) = args.try_get_one::<String>(key).unwrap_or(None) {
                builder = builder.set_override(format!("build.{key}"), value.clone())?;
            }
        }

        let config: MementoConfig = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Get the build configuration
    pub fn build_config(&self) -> &BuildConfig {
        &self.build
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{Arg, Command};
    use indoc::indoc;
    use sealed_test::prelude::*;

    fn command() -> Command {
        Command::new("test")
            .arg(Arg::new("data").long("data").value_name("FILE"))
            .arg(Arg::new("output").long("output").value_name("DIR"))
            .arg(Arg::new("config").long("config").value_name("FILE"))
    }

    #[test]
    fn test_default_config() {
        let config = MementoConfig::default();
        assert_eq!(config.build.data, "./data/commands.json");
        assert_eq!(config.build.output, "./out");
        assert_eq!(config.build.theme, "./theme");
        assert_eq!(config.build.public, "./public");
        assert_eq!(config.build.debounce(), Duration::from_millis(500));
    }

    #[sealed_test]
    fn test_cli_args_override() {
        let matches = command()
            .try_get_matches_from(vec![
                "test",
                "--data",
                "/custom/commands.json",
                "--output",
                "/custom/output",
            ])
            .unwrap();

        let config = MementoConfig::load(&matches).unwrap();
        assert_eq!(config.build.data, "/custom/commands.json");
        assert_eq!(config.build.output, "/custom/output");
        // Should still have defaults for non-overridden values
        assert_eq!(config.build.theme, "./theme");
    }

    #[sealed_test]
    fn test_config_file_feeds_site_and_build() {
        std::fs::write(
            "memento.toml",
            indoc! {r#"
                [build]
                output = "./dist"

                [site]
                title = "Team cheat sheet"

                [labels.copy]
                idle = "Copier"
            "#},
        )
        .unwrap();

        let matches = command().try_get_matches_from(vec!["test"]).unwrap();
        let config = MementoConfig::load(&matches).unwrap();

        assert_eq!(config.build.output, "./dist");
        assert_eq!(config.build.theme, "./theme");
        assert_eq!(config.site.site().title, "Team cheat sheet");
        assert_eq!(config.site.labels().copy.idle, "Copier");
        assert_eq!(config.site.labels().copy.copied, "Copied!");
    }

    #[sealed_test(env = [("MEMENTO_BUILD__OUTPUT", "/env/out")])]
    fn test_env_sits_between_file_and_cli() {
        std::fs::write(
            "memento.toml",
            "[build]\noutput = \"./dist\"\ntheme = \"./skin\"\n",
        )
        .unwrap();

        let matches = command().try_get_matches_from(vec!["test"]).unwrap();
        let config = MementoConfig::load(&matches).unwrap();
        assert_eq!(config.build.output, "/env/out");
        assert_eq!(config.build.theme, "./skin");

        let matches = command()
            .try_get_matches_from(vec!["test", "--output", "/cli/out"])
            .unwrap();
        let config = MementoConfig::load(&matches).unwrap();
        assert_eq!(config.build.output, "/cli/out");
    }
}
