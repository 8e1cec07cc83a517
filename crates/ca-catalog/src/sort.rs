//! Orderings for application lists.

use std::cmp::Ordering;

use ca_config::{Settings, SortDirection, SortOrder};
use ca_template::Template;
use rayon::slice::ParallelSliceMut;
use serde_json::Value;

/// Keys that always compare numerically, even when stored as text.
const NUMERIC_KEYS: &[&str] = &["downloads", "stars", "Date", "FirstSeen", "trending"];

fn is_numeric(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::Number(_)))
}

/// Compares two templates on the key and direction of `order`.
///
/// Numbers compare numerically, everything else as lowercase text. A
/// descending order reverses the result.
pub fn my_sort(a: &Template, b: &Template, order: &SortOrder) -> Ordering {
    let key = order.key();
    let (left, right) = (a.get(key), b.get(key));

    let ordering = if NUMERIC_KEYS.contains(&key) || (is_numeric(left) && is_numeric(right)) {
        let left = a.number(key).unwrap_or_default();
        let right = b.number(key).unwrap_or_default();
        left.total_cmp(&right)
    } else {
        a.text(key).to_lowercase().cmp(&b.text(key).to_lowercase())
    };

    match order.sort_dir {
        SortDirection::Up => ordering,
        SortDirection::Down => ordering.reverse(),
    }
}

fn favourite_first(a: &str, b: &str, favourite: Option<&str>) -> Ordering {
    let Some(favourite) = favourite.filter(|f| !f.is_empty()) else {
        return Ordering::Equal;
    };
    match (a == favourite, b == favourite) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

/// Puts the favourite repository (matched on `RepoName`) first.
pub fn repository_sort(a: &Template, b: &Template, settings: &Settings) -> Ordering {
    favourite_first(
        a.str_of("RepoName"),
        b.str_of("RepoName"),
        settings.favourite.as_deref(),
    )
}

/// Puts apps from the favourite repository (matched on `Repo`) first.
pub fn favourite_sort(a: &Template, b: &Template, settings: &Settings) -> Ordering {
    favourite_first(
        a.str_of("Repo"),
        b.str_of("Repo"),
        settings.favourite.as_deref(),
    )
}

/// Sorts in place: favourite repository first, then by `order`.
pub fn sort_templates(templates: &mut [Template], order: &SortOrder, settings: &Settings) {
    templates.par_sort_by(|a, b| {
        favourite_sort(a, b, settings).then_with(|| my_sort(a, b, order))
    });
}
