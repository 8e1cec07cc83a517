use std::collections::BTreeMap;

use ca_config::SortOrder;
use ca_template::Template;
use serde::Serialize;

// ---- Search ----

/// Options for a catalog search.
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub query: String,
    /// Require every word of the query instead of any.
    pub exact: bool,
    /// Overrides the sort order from the settings.
    pub sort: Option<SortOrder>,
    /// 1-based page number.
    pub page: usize,
    /// Overrides `max_per_page` from the settings.
    pub per_page: Option<usize>,
}

/// One page of a list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page number, clamped to the available pages.
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// Result of a catalog search.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub page: Page<Template>,
    pub matched: usize,
}

// ---- Duplicates ----

/// Plugin file names shared by several templates, with their counts.
pub type PluginDupes = BTreeMap<String, usize>;
