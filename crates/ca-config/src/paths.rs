use std::path::{Path, PathBuf};

use serde::Serialize;

pub const DEFAULT_TEMP_DIR: &str = "/tmp/community.applications/tempFiles";
pub const DEFAULT_FLASH_DIR: &str = "/boot/config/plugins/community.applications";
pub const DEFAULT_INSTALLED_PLUGINS_DIR: &str = "/var/log/plugins";
pub const DEFAULT_INSTALLED_LANGUAGES_DIR: &str = "/boot/config/plugins";
pub const DEFAULT_UNRAID_VERSION_FILE: &str = "/etc/unraid-version";

/// Locations of every file the catalog reads or writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Paths {
    /// Scratch directory for caches and temporary files.
    pub temp_files: PathBuf,
    /// Persistent plugin directory on the flash drive.
    pub flash_drive: PathBuf,
    /// Cached list of every known template.
    pub templates_info: PathBuf,
    pub plugin_attributes_cache: PathBuf,
    /// Plugins whose file name is shared by more than one template.
    pub plugin_dupes: PathBuf,
    /// Directory holding `lang-<code>.xml` for installed language packs.
    pub installed_languages: PathBuf,
    /// Directory holding the `.plg` file of every installed plugin.
    pub installed_plugins: PathBuf,
    pub settings_file: PathBuf,
    pub unraid_version_file: PathBuf,
}

impl Paths {
    /// Derives every path from a scratch directory and a flash directory.
    pub fn rooted<T: AsRef<Path>, F: AsRef<Path>>(temp: T, flash: F) -> Self {
        let temp = temp.as_ref();
        let flash = flash.as_ref();

        Self {
            temp_files: temp.to_path_buf(),
            flash_drive: flash.to_path_buf(),
            templates_info: temp.join("templates.json"),
            plugin_attributes_cache: temp.join("pluginAttributesCache"),
            plugin_dupes: temp.join("pluginDupes"),
            installed_languages: PathBuf::from(DEFAULT_INSTALLED_LANGUAGES_DIR),
            installed_plugins: PathBuf::from(DEFAULT_INSTALLED_PLUGINS_DIR),
            settings_file: flash.join("community.applications.cfg"),
            unraid_version_file: PathBuf::from(DEFAULT_UNRAID_VERSION_FILE),
        }
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::rooted(DEFAULT_TEMP_DIR, DEFAULT_FLASH_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rooted() {
        let paths = Paths::rooted("/tmp/ca", "/flash/ca");
        assert_eq!(paths.templates_info, PathBuf::from("/tmp/ca/templates.json"));
        assert_eq!(paths.plugin_dupes, PathBuf::from("/tmp/ca/pluginDupes"));
        assert_eq!(
            paths.settings_file,
            PathBuf::from("/flash/ca/community.applications.cfg")
        );
        assert_eq!(paths.installed_plugins, PathBuf::from("/var/log/plugins"));
    }

    #[test]
    fn test_default() {
        let paths = Paths::default();
        assert_eq!(paths.temp_files, PathBuf::from(DEFAULT_TEMP_DIR));
        assert_eq!(paths.unraid_version_file, PathBuf::from("/etc/unraid-version"));
    }
}
