use std::path::Path;

use ca_store::{load_state_file, Kind};
use ca_template::{dump_value, load_xml_file, make_xml, Template, TemplateError};
use miette::Result;
use tracing::{debug, info, trace};

pub fn show_template(file: &str, generic: bool) -> Result<()> {
    debug!(file = file, generic = generic, "reading template");
    let template = load_xml_file(Path::new(file), generic)?;

    let rendered = serde_json::to_string_pretty(&template).map_err(ca_store::StoreError::from)?;
    info!("{rendered}");
    Ok(())
}

pub fn print_xml(file: &str) -> Result<()> {
    debug!(file = file, "converting template to XML");
    let value = load_state_file(file)?;
    trace!("decoded template:\n{}", dump_value(&value));
    let template = Template::try_from(value)
        .map_err(|rejected| TemplateError::NotAMap(format!("{file} holds {}", Kind::of(&rejected))))?;

    info!("{}", make_xml(&template));
    Ok(())
}
