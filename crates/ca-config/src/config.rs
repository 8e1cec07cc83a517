use std::{
    env, fs,
    path::{Path, PathBuf},
};

use ca_utils::path::{resolve_path, xdg_config_home};
use documented::{Documented, DocumentedFields};
use serde::{Deserialize, Serialize};
use toml_edit::DocumentMut;
use tracing::{debug, info};

use crate::{
    annotations::annotate_toml_table,
    error::{ConfigError, Result},
    paths::{
        Paths, DEFAULT_FLASH_DIR, DEFAULT_INSTALLED_LANGUAGES_DIR, DEFAULT_INSTALLED_PLUGINS_DIR,
        DEFAULT_TEMP_DIR, DEFAULT_UNRAID_VERSION_FILE,
    },
    settings::{SortDirection, SortOrder},
};

/// Default ordering of application lists
#[derive(Clone, Debug, Deserialize, Serialize, Documented, DocumentedFields)]
pub struct SortConfig {
    /// Template field to sort on. `Name` sorts on the normalized name.
    /// Default: Name
    pub by: Option<String>,

    /// Either `Up` or `Down`.
    /// Default: Up
    pub direction: Option<String>,
}

/// Configuration of the `ca` tool
#[derive(Clone, Debug, Deserialize, Serialize, Documented, DocumentedFields)]
pub struct Config {
    /// Scratch directory for the template cache, attribute cache and dupe list.
    /// Overridden by $CA_TEMP.
    /// Default: /tmp/community.applications/tempFiles
    pub temp_path: Option<String>,

    /// Plugin directory on the flash drive holding the settings file.
    /// Overridden by $CA_FLASH.
    /// Default: /boot/config/plugins/community.applications
    pub flash_path: Option<String>,

    /// Directory holding the .plg file of every installed plugin.
    /// Default: /var/log/plugins
    pub installed_plugins_path: Option<String>,

    /// Directory holding installed language packs.
    /// Default: /boot/config/plugins
    pub installed_languages_path: Option<String>,

    /// File carrying the OS version as `version="x.y.z"`.
    /// Default: /etc/unraid-version
    pub unraid_version_file: Option<String>,

    /// Sort applied when the settings file does not choose one.
    pub sort: Option<SortConfig>,
}

/// Location of the config file: `$CA_CONFIG`, else `$XDG_CONFIG_HOME/ca/config.toml`.
pub fn config_path() -> PathBuf {
    match env::var("CA_CONFIG") {
        Ok(path) => PathBuf::from(path),
        Err(_) => xdg_config_home().join("ca").join("config.toml"),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn default_config() -> Self {
        Self {
            temp_path: Some(DEFAULT_TEMP_DIR.into()),
            flash_path: Some(DEFAULT_FLASH_DIR.into()),
            installed_plugins_path: Some(DEFAULT_INSTALLED_PLUGINS_DIR.into()),
            installed_languages_path: Some(DEFAULT_INSTALLED_LANGUAGES_DIR.into()),
            unraid_version_file: Some(DEFAULT_UNRAID_VERSION_FILE.into()),
            sort: Some(SortConfig {
                by: Some("Name".into()),
                direction: Some(SortDirection::Up.to_string()),
            }),
        }
    }

    /// Loads the configuration from [`config_path`].
    /// If the configuration file is not found, it uses the default configuration.
    pub fn new() -> Result<Self> {
        Self::load_from(config_path())
    }

    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut config = match fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("no config at {}, using defaults", path.display());
                Self::default_config()
            }
            Err(err) => return Err(ConfigError::IoError(err)),
        };

        config.resolve()?;
        Ok(config)
    }

    /// Fills unset fields with defaults and validates the sort section.
    pub fn resolve(&mut self) -> Result<()> {
        let defaults = Self::default_config();

        self.temp_path.get_or_insert_with(|| DEFAULT_TEMP_DIR.into());
        self.flash_path.get_or_insert_with(|| DEFAULT_FLASH_DIR.into());
        self.installed_plugins_path
            .get_or_insert_with(|| DEFAULT_INSTALLED_PLUGINS_DIR.into());
        self.installed_languages_path
            .get_or_insert_with(|| DEFAULT_INSTALLED_LANGUAGES_DIR.into());
        self.unraid_version_file
            .get_or_insert_with(|| DEFAULT_UNRAID_VERSION_FILE.into());

        let sort = self.sort.get_or_insert_with(|| SortConfig {
            by: None,
            direction: None,
        });
        if let Some(default_sort) = defaults.sort {
            if sort.by.is_none() {
                sort.by = default_sort.by;
            }
            if sort.direction.is_none() {
                sort.direction = default_sort.direction;
            }
        }
        if let Some(direction) = &sort.direction {
            direction.parse::<SortDirection>()?;
        }

        Ok(())
    }

    fn resolve_or(value: Option<&String>, default: &str) -> Result<PathBuf> {
        Ok(resolve_path(value.map_or(default, String::as_str))?)
    }

    /// Resolves every configured location. `$CA_TEMP` and `$CA_FLASH` take
    /// precedence over the file.
    pub fn paths(&self) -> Result<Paths> {
        let temp = match env::var("CA_TEMP") {
            Ok(path) => resolve_path(&path)?,
            Err(_) => Self::resolve_or(self.temp_path.as_ref(), DEFAULT_TEMP_DIR)?,
        };
        let flash = match env::var("CA_FLASH") {
            Ok(path) => resolve_path(&path)?,
            Err(_) => Self::resolve_or(self.flash_path.as_ref(), DEFAULT_FLASH_DIR)?,
        };

        let mut paths = Paths::rooted(temp, flash);
        paths.installed_plugins = Self::resolve_or(
            self.installed_plugins_path.as_ref(),
            DEFAULT_INSTALLED_PLUGINS_DIR,
        )?;
        paths.installed_languages = Self::resolve_or(
            self.installed_languages_path.as_ref(),
            DEFAULT_INSTALLED_LANGUAGES_DIR,
        )?;
        paths.unraid_version_file = Self::resolve_or(
            self.unraid_version_file.as_ref(),
            DEFAULT_UNRAID_VERSION_FILE,
        )?;
        Ok(paths)
    }

    pub fn sort_order(&self) -> Result<SortOrder> {
        let mut order = SortOrder::default();
        if let Some(sort) = &self.sort {
            if let Some(by) = &sort.by {
                order.sort_by = by.clone();
            }
            if let Some(direction) = &sort.direction {
                order.sort_dir = direction.parse()?;
            }
        }
        Ok(order)
    }

    pub fn to_annotated_document(&self) -> Result<DocumentMut> {
        let toml_string = toml::to_string_pretty(self)?;
        let mut doc = toml_string.parse::<DocumentMut>()?;

        annotate_toml_table::<Config>(doc.as_table_mut(), true)?;

        if let Some(sort_table) = doc.get_mut("sort").and_then(|item| item.as_table_mut()) {
            annotate_toml_table::<SortConfig>(sort_table, false)?;
        }

        Ok(doc)
    }
}

/// Writes the default configuration, annotated with field docs, to `path`.
///
/// Refuses to overwrite an existing file.
pub fn generate_default_config<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();

    if path.exists() {
        return Err(ConfigError::ConfigAlreadyExists);
    }

    let annotated_doc = Config::default_config().to_annotated_document()?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, annotated_doc.to_string())?;
    info!(
        "Default configuration file generated with documentation at: {}",
        path.display()
    );
    Ok(())
}
