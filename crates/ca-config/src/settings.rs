use std::{fmt, str::FromStr};

use ca_store::{read_ini_file, write_ini_file};
use ca_utils::system::read_os_version;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::{
    error::{ConfigError, Result},
    paths::Paths,
    utils::{flag_text, parse_flag},
};

/// OS version assumed when `/etc/unraid-version` cannot be read.
pub const DEFAULT_UNRAID_VERSION: &str = "7.0.0";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    #[default]
    Up,
    Down,
}

impl FromStr for SortDirection {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "asc" => Ok(SortDirection::Up),
            "down" | "desc" => Ok(SortDirection::Down),
            _ => Err(ConfigError::InvalidSortDirection(s.to_string())),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Up => write!(f, "Up"),
            SortDirection::Down => write!(f, "Down"),
        }
    }
}

/// Key and direction used to order application lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOrder {
    pub sort_by: String,
    pub sort_dir: SortDirection,
}

impl Default for SortOrder {
    fn default() -> Self {
        Self {
            sort_by: "Name".into(),
            sort_dir: SortDirection::Up,
        }
    }
}

impl SortOrder {
    pub fn new<S: Into<String>>(sort_by: S, sort_dir: SortDirection) -> Self {
        Self {
            sort_by: sort_by.into(),
            sort_dir,
        }
    }

    /// Template key actually compared. `Name` sorts on the normalized `SortName`.
    pub fn key(&self) -> &str {
        if self.sort_by == "Name" {
            "SortName"
        } else {
            &self.sort_by
        }
    }
}

/// User settings of the plugin, persisted as `community.applications.cfg`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub max_per_page: usize,
    pub docker_search: String,
    pub icon_size: u32,
    pub dev: String,
    pub unraid_version: String,
    /// Repository shown ahead of every other one.
    pub favourite: Option<String>,
    pub hide_incompatible: bool,
    pub hide_deprecated: bool,
    pub sort_order: SortOrder,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_per_page: 24,
            docker_search: "yes".into(),
            icon_size: 96,
            dev: "no".into(),
            unraid_version: DEFAULT_UNRAID_VERSION.into(),
            favourite: None,
            hide_incompatible: false,
            hide_deprecated: false,
            sort_order: SortOrder::default(),
        }
    }
}

fn ini_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl Settings {
    /// Builds settings from the key/value map of the settings file.
    ///
    /// Unknown keys are ignored, unparsable values keep their default.
    pub fn from_ini_map(map: &Map<String, Value>) -> Self {
        let mut settings = Self::default();

        for (key, value) in map {
            let text = ini_text(value);
            match key.as_str() {
                "maxPerPage" => match text.trim().parse() {
                    Ok(n) if n > 0 => settings.max_per_page = n,
                    _ => warn!("ignoring invalid maxPerPage '{}'", text),
                },
                "iconSize" => match text.trim().parse() {
                    Ok(n) => settings.icon_size = n,
                    Err(_) => warn!("ignoring invalid iconSize '{}'", text),
                },
                "dockerSearch" => settings.docker_search = text,
                "dev" => settings.dev = text,
                "favourite" => {
                    settings.favourite = Some(text).filter(|s| !s.is_empty());
                }
                "hideIncompatible" => match parse_flag(&text) {
                    Some(flag) => settings.hide_incompatible = flag,
                    None => warn!("ignoring invalid hideIncompatible '{}'", text),
                },
                "hideDeprecated" => match parse_flag(&text) {
                    Some(flag) => settings.hide_deprecated = flag,
                    None => warn!("ignoring invalid hideDeprecated '{}'", text),
                },
                "sortBy" if !text.is_empty() => settings.sort_order.sort_by = text,
                "sortDir" => match text.parse() {
                    Ok(dir) => settings.sort_order.sort_dir = dir,
                    Err(err) => warn!("{}", err),
                },
                _ => {}
            }
        }

        settings
    }

    /// Inverse of [`Settings::from_ini_map`]. The OS version is not persisted.
    pub fn to_ini_map(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("maxPerPage".into(), self.max_per_page.to_string().into());
        map.insert("dockerSearch".into(), self.docker_search.clone().into());
        map.insert("iconSize".into(), self.icon_size.to_string().into());
        map.insert("dev".into(), self.dev.clone().into());
        map.insert(
            "favourite".into(),
            self.favourite.clone().unwrap_or_default().into(),
        );
        map.insert(
            "hideIncompatible".into(),
            flag_text(self.hide_incompatible).into(),
        );
        map.insert(
            "hideDeprecated".into(),
            flag_text(self.hide_deprecated).into(),
        );
        map.insert("sortBy".into(), self.sort_order.sort_by.clone().into());
        map.insert("sortDir".into(), self.sort_order.sort_dir.to_string().into());
        map
    }

    /// Loads the settings file and the OS version, using defaults for
    /// whatever is missing.
    pub fn load(paths: &Paths) -> Self {
        let mut settings = match read_ini_file(&paths.settings_file) {
            Ok(map) => Self::from_ini_map(&map),
            Err(err) => {
                debug!("using default settings: {}", err);
                Self::default()
            }
        };

        match read_os_version(&paths.unraid_version_file) {
            Some(version) => settings.unraid_version = version,
            None => {
                debug!(
                    "no OS version in {}, assuming {}",
                    paths.unraid_version_file.display(),
                    DEFAULT_UNRAID_VERSION
                );
            }
        }

        settings
    }

    /// Writes the settings file. Returns the number of bytes written.
    ///
    /// Keys already in the file that are not modelled here are kept.
    pub fn save(&self, paths: &Paths) -> Result<usize> {
        let mut map = if paths.settings_file.exists() {
            read_ini_file(&paths.settings_file)?
        } else {
            Map::new()
        };
        map.extend(self.to_ini_map());
        Ok(write_ini_file(&paths.settings_file, &map)?)
    }

    pub fn is_dev(&self) -> bool {
        self.dev == "yes"
    }
}
