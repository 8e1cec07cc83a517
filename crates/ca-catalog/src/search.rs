use ca_config::Settings;
use ca_template::{fix_templates, Template};
use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::{debug, trace};

use crate::{
    filter::filter_templates, page::paginate, sort::sort_templates, Catalog, SearchOptions,
    SearchResult,
};

/// Whether a normalized template belongs in a listing under `settings`.
fn is_listed(template: &Template, settings: &Settings) -> bool {
    if template.flag("Blacklist") {
        return false;
    }
    if settings.hide_incompatible && !template.flag("Compatible") {
        return false;
    }
    if settings.hide_deprecated && template.flag("Deprecated") {
        return false;
    }
    true
}

/// Search the catalog, then sort and paginate the matches.
pub fn search_templates(
    catalog: &Catalog,
    options: &SearchOptions,
    settings: &Settings,
) -> SearchResult {
    debug!(
        query = options.query.as_str(),
        exact = options.exact,
        page = options.page,
        "searching templates"
    );

    let matched = filter_templates(catalog.templates(), &options.query, options.exact);

    let mut listed: Vec<Template> = matched
        .into_par_iter()
        .map(|template| fix_templates(template, settings))
        .filter(|template| is_listed(template, settings))
        .collect();
    trace!(listed = listed.len(), "templates left after settings filters");

    let order = options.sort.as_ref().unwrap_or(&settings.sort_order);
    sort_templates(&mut listed, order, settings);

    let per_page = options.per_page.unwrap_or(settings.max_per_page);
    let matched = listed.len();
    SearchResult {
        page: paginate(&listed, options.page, per_page),
        matched,
    }
}
