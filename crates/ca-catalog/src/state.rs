//! Small state files kept next to the catalog.

use std::path::PathBuf;

use ca_config::Paths;
use ca_store::write_json_file;
use ca_utils::fs::{ensure_dir_exists, random_file as scratch_file, safe_remove};
use tracing::{debug, trace};

use crate::{error::Result, Catalog, PluginDupes};

fn file_name(repository: &str) -> &str {
    repository
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or(repository)
}

/// Plugin file names that more than one plugin template points at.
///
/// Container templates never count.
pub fn find_plugin_dupes(catalog: &Catalog) -> PluginDupes {
    let mut counts = PluginDupes::new();
    for template in catalog.templates().iter().filter(|t| t.flag("Plugin")) {
        let name = file_name(template.str_of("Repository"));
        if name.is_empty() {
            continue;
        }
        *counts.entry(name.to_string()).or_default() += 1;
    }
    counts.retain(|_, count| *count > 1);
    counts
}

/// Recomputes the duplicate plugin list and writes it to `plugin_dupes`.
pub fn plugin_dupe(catalog: &Catalog, paths: &Paths) -> Result<PluginDupes> {
    let dupes = find_plugin_dupes(catalog);
    debug!(dupes = dupes.len(), path = %paths.plugin_dupes.display(), "writing plugin dupes");

    if let Some(parent) = paths.plugin_dupes.parent() {
        ensure_dir_exists(parent)?;
    }
    write_json_file(&paths.plugin_dupes, &dupes)?;
    Ok(dupes)
}

/// Deletes the plugin attribute cache. A missing cache is not an error.
pub fn drop_attribute_cache(paths: &Paths) -> Result<()> {
    trace!(path = %paths.plugin_attributes_cache.display(), "dropping attribute cache");
    safe_remove(&paths.plugin_attributes_cache)?;
    Ok(())
}

/// Creates a uniquely named scratch file in the temporary directory.
pub fn random_file(paths: &Paths) -> Result<PathBuf> {
    ensure_dir_exists(&paths.temp_files)?;
    Ok(scratch_file(&paths.temp_files)?)
}
