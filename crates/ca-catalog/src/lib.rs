//! Catalog-level operations for Community Applications.
//!
//! The [`Catalog`] holds every known template. On top of it this crate sorts,
//! filters and paginates application lists, decides which apps may be
//! suggested at random, and maintains the small state files kept next to the
//! catalog (duplicate plugin list, attribute cache, scratch files).

mod catalog;
pub mod env;
pub mod error;
pub mod filter;
pub mod page;
pub mod random;
pub mod search;
pub mod sort;
pub mod state;
pub mod types;

pub use catalog::Catalog;
pub use env::{get_post, is_mobile, is_tailscale_installed};
pub use error::{CatalogError, Result};
pub use filter::{array_entries_to_object, filter_match, filter_templates, search_array};
pub use page::paginate;
pub use random::check_random_app;
pub use search::search_templates;
pub use sort::{favourite_sort, my_sort, repository_sort, sort_templates};
pub use state::{drop_attribute_cache, find_plugin_dupes, plugin_dupe, random_file};
pub use types::*;
