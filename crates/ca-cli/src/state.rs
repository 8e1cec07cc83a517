use std::{env, path::PathBuf, sync::OnceLock};

use ca_catalog::Catalog;
use ca_config::{config_path, Config, Paths, Settings};
use ca_utils::path::resolve_path;
use miette::{IntoDiagnostic, Result};
use tracing::debug;

/// Configuration and lazily loaded data shared by every command.
pub struct AppState {
    config: Config,
    paths: Paths,
    settings: OnceLock<Settings>,
    catalog: OnceLock<Catalog>,
}

impl AppState {
    pub fn new(config_file: Option<&str>) -> Result<Self> {
        let path = match config_file {
            Some(file) => absolute_config_path(file)?,
            None => config_path(),
        };
        debug!(path = %path.display(), "loading configuration");

        let config = Config::load_from(&path)?;
        let paths = config.paths()?;

        Ok(Self {
            config,
            paths,
            settings: OnceLock::new(),
            catalog: OnceLock::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn paths(&self) -> &Paths {
        &self.paths
    }

    pub fn settings(&self) -> &Settings {
        self.settings.get_or_init(|| Settings::load(&self.paths))
    }

    pub fn catalog(&self) -> &Catalog {
        self.catalog.get_or_init(|| Catalog::new(&self.paths))
    }
}

pub fn absolute_config_path(file: &str) -> Result<PathBuf> {
    let path = resolve_path(file).into_diagnostic()?;
    if path.is_absolute() {
        return Ok(path);
    }
    Ok(env::current_dir().into_diagnostic()?.join(path))
}
