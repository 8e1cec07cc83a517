use ca_catalog::{search_templates, SearchOptions};
use ca_config::SortOrder;
use ca_store::StoreError;
use ca_template::{category_list, get_author, get_downloads};
use miette::Result;
use nu_ansi_term::Color::{Blue, Cyan, Green, LightRed, Yellow};
use tracing::info;

use crate::{
    state::AppState,
    utils::{Colored, Icons},
};

pub struct SearchArgs {
    pub query: Option<String>,
    pub any: bool,
    pub sort_by: Option<String>,
    pub sort_dir: Option<String>,
    pub page: usize,
    pub per_page: Option<usize>,
}

fn sort_order(state: &AppState, args: &SearchArgs) -> Result<SortOrder> {
    let mut order = state.config().sort_order()?;
    if let Some(sort_by) = &args.sort_by {
        order.sort_by = sort_by.clone();
    }
    if let Some(sort_dir) = &args.sort_dir {
        order.sort_dir = sort_dir.parse()?;
    }
    Ok(order)
}

pub fn search_catalog(state: &AppState, args: SearchArgs, json: bool) -> Result<()> {
    let options = SearchOptions {
        sort: Some(sort_order(state, &args)?),
        query: args.query.unwrap_or_default(),
        exact: !args.any,
        page: args.page,
        per_page: args.per_page,
    };

    let result = search_templates(state.catalog(), &options, state.settings());

    if json {
        let rendered = serde_json::to_string(&result).map_err(StoreError::from)?;
        info!("{rendered}");
        return Ok(());
    }

    for template in &result.page.items {
        let downloads = template
            .number("downloads")
            .map(|count| get_downloads(count as u64, false))
            .unwrap_or_default();

        let mut flags = String::new();
        if template.flag("Deprecated") {
            flags.push_str(&format!(" {}", Colored(Yellow, "[deprecated]")));
        }
        if !template.flag("Compatible") {
            flags.push_str(&format!(
                " {}",
                Colored(LightRed, format!("{} incompatible", Icons::WARNING))
            ));
        }

        info!(
            "{} {} {} | {}{}",
            Colored(Blue, template.str_of("Name")),
            Icons::ARROW,
            Colored(Cyan, get_author(template)),
            Colored(Green, category_list(template.str_of("Category"), false)),
            flags
        );
        if !downloads.is_empty() {
            info!("    {downloads} downloads");
        }
    }

    info!(
        "Page {} of {} ({} matching applications)",
        result.page.page, result.page.total_pages, result.matched
    );
    Ok(())
}
