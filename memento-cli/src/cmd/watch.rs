use anyhow::Result;
use clap::{Arg, ArgMatches, Command};
use memento_core::{BuildPaths, build_site};
use notify::{RecursiveMode, Watcher};
use notify_debouncer_mini::{DebounceEventResult, new_debouncer};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::cmd::build::add_build_args;
use crate::config::MementoConfig;

pub fn make_subcommand() -> Command {
    add_build_args(Command::new("watch"))
        .about("Build, then rebuild whenever the data, theme, assets or config change")
        .arg(
            Arg::new("debounce_ms")
                .long("debounce")
                .value_name("MS")
                .help("Quiet period before rebuilding [default: 500]"),
        )
}

pub async fn execute(args: &ArgMatches) -> Result<()> {
    let config = MementoConfig::load(args)?;

    // A broken first build is reported but keeps the watcher alive.
    rebuild(&config);
    watch_sources(args, config).await
}

fn rebuild(config: &MementoConfig) {
    let paths = config.build_config().paths();
    match build_site(&config.site, &paths) {
        Ok(index) => info!("site rebuilt: {}", index.display()),
        Err(e) => error!("build error: {e}"),
    }
}

fn absolute(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Inputs whose changes trigger a rebuild, and the output they build into.
#[derive(Debug, Clone, PartialEq, Eq)]
struct WatchSet {
    /// Input paths, with whether to watch recursively.
    inputs: Vec<(PathBuf, bool)>,
    config_file: PathBuf,
    output: PathBuf,
}

impl WatchSet {
    fn from_config(config: &MementoConfig) -> Self {
        let build = config.build_config();
        let BuildPaths {
            data,
            theme,
            public,
            output,
        } = build.paths();
        let config_file = PathBuf::from(&build.config);

        Self {
            inputs: vec![
                (data, false),
                (theme, true),
                (public, true),
                (config_file.clone(), false),
            ],
            config_file,
            output,
        }
    }

    /// Whether a changed path belongs to one of the inputs. Output files never do.
    fn is_source_change(&self, path: &Path) -> bool {
        let path = absolute(path);
        if path.starts_with(absolute(&self.output)) {
            return false;
        }
        self.inputs.iter().any(|(input, recursive)| {
            let input = absolute(input);
            if *recursive {
                path.starts_with(&input)
            } else {
                path == input
            }
        })
    }

    fn is_config_file(&self, path: &Path) -> bool {
        absolute(path) == absolute(&self.config_file)
    }

    fn watch(&self, watcher: &mut dyn Watcher) -> Result<()> {
        for (path, recursive) in &self.inputs {
            if !path.exists() {
                debug!("not watching missing {}", path.display());
                continue;
            }
            let mode = if *recursive {
                RecursiveMode::Recursive
            } else {
                RecursiveMode::NonRecursive
            };
            watcher.watch(path, mode)?;
            info!("watching {}", path.display());
        }
        Ok(())
    }

    fn unwatch(&self, watcher: &mut dyn Watcher) {
        for (path, _) in &self.inputs {
            if let Err(e) = watcher.unwatch(path) {
                debug!("could not unwatch {}: {e}", path.display());
            }
        }
    }
}

async fn watch_sources(args: &ArgMatches, mut config: MementoConfig) -> Result<()> {
    let (tx, mut rx) = tokio::sync::mpsc::channel(100);

    let mut debouncer = new_debouncer(
        config.build_config().debounce(),
        move |res: DebounceEventResult| match res {
            Ok(events) => {
                for event in events {
                    let _ = tx.blocking_send(event.path);
                }
            }
            Err(e) => warn!("watch error: {e:?}"),
        },
    )?;

    let mut watched = WatchSet::from_config(&config);
    watched.watch(debouncer.watcher())?;

    while let Some(path) = rx.recv().await {
        if !watched.is_source_change(&path) {
            debug!("skipping non-source change: {}", path.display());
            continue;
        }
        info!("changed: {}", path.display());

        if watched.is_config_file(&path) {
            match MementoConfig::load(args) {
                Ok(reloaded) => config = reloaded,
                Err(e) => warn!("keeping previous configuration: {e}"),
            }

            // The reloaded [build] section may point at other inputs.
            let next = WatchSet::from_config(&config);
            if next != watched {
                watched.unwatch(debouncer.watcher());
                if let Err(e) = next.watch(debouncer.watcher()) {
                    warn!("could not watch the reloaded inputs: {e}");
                }
                watched = next;
            }
        }

        rebuild(&config);
    }

    Ok(())
}
