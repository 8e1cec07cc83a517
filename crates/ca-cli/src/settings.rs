use ca_store::StoreError;
use ca_utils::path::display_path;
use miette::Result;
use nu_ansi_term::Color::{Blue, Green};
use tracing::info;

use crate::{state::AppState, utils::Colored};

pub fn show_settings(state: &AppState, write: bool, json: bool) -> Result<()> {
    let settings = state.settings();

    if json {
        let rendered = serde_json::to_string(settings).map_err(StoreError::from)?;
        info!("{rendered}");
    } else {
        info!("{}: {}", Colored(Blue, "unraidVersion"), settings.unraid_version);
        for (key, value) in settings.to_ini_map() {
            let value = value.as_str().map(String::from).unwrap_or_else(|| value.to_string());
            info!("{}: {}", Colored(Blue, key), value);
        }
    }

    if write {
        let written = settings.save(state.paths())?;
        info!(
            "{} {} bytes to {}",
            Colored(Green, "Wrote"),
            written,
            display_path(&state.paths().settings_file)
        );
    }
    Ok(())
}
