use ca_catalog::{drop_attribute_cache, plugin_dupe};
use ca_utils::path::display_path;
use miette::Result;
use nu_ansi_term::Color::{Green, Yellow};
use tracing::info;

use crate::{
    state::AppState,
    utils::{Colored, Icons},
};

pub fn refresh_plugin_dupes(state: &AppState) -> Result<()> {
    let dupes = plugin_dupe(state.catalog(), state.paths())?;

    if dupes.is_empty() {
        info!("{}", Colored(Green, "No duplicate plugins"));
    }
    for (name, count) in &dupes {
        info!("{} is provided by {} templates", Colored(Yellow, name), count);
    }
    info!(
        "Duplicate list written to {}",
        display_path(&state.paths().plugin_dupes)
    );
    Ok(())
}

pub fn drop_cache(state: &AppState) -> Result<()> {
    let cache = &state.paths().plugin_attributes_cache;
    if !cache.exists() {
        info!("{} No attribute cache at {}", Icons::CROSS, display_path(cache));
        return Ok(());
    }

    drop_attribute_cache(state.paths())?;
    info!("Removed {}", display_path(cache));
    Ok(())
}
