//! Text search over templates.

use ca_template::{template::value_text, Template};
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use serde_json::{Map, Value};
use tracing::{debug, trace};

/// Template fields a search query is matched against.
pub const SEARCH_FIELDS: &[&str] = &[
    "Name",
    "Author",
    "Overview",
    "Repository",
    "Category",
    "RepoName",
    "ExtraSearchTerms",
];

/// Whether the words of `filter` occur in `fields`.
///
/// Matching is a case-insensitive substring test. In `exact` mode every word
/// must be found; otherwise one is enough. An empty filter or an empty field
/// list never matches.
pub fn filter_match<S: AsRef<str>>(filter: &str, fields: &[S], exact: bool) -> bool {
    let words: Vec<String> = filter.split_whitespace().map(str::to_lowercase).collect();
    if words.is_empty() || fields.is_empty() {
        return false;
    }

    let fields: Vec<String> = fields.iter().map(|f| f.as_ref().to_lowercase()).collect();
    let found = |word: &String| fields.iter().any(|field| field.contains(word.as_str()));

    if exact {
        words.iter().all(found)
    } else {
        words.iter().any(found)
    }
}

/// Index of the first template at or after `start` whose `key` equals `value`.
pub fn search_array(list: &[Template], key: &str, value: &str, start: usize) -> Option<usize> {
    list.iter()
        .enumerate()
        .skip(start)
        .find(|(_, template)| template.contains_key(key) && template.text(key) == value)
        .map(|(idx, _)| idx)
}

/// Turns a list of names into a map from each name to `flag` (default `true`).
///
/// Anything other than a list yields an empty map.
pub fn array_entries_to_object(list: &Value, flag: Option<Value>) -> Map<String, Value> {
    let Value::Array(items) = list else {
        return Map::new();
    };
    let flag = flag.unwrap_or(Value::Bool(true));
    items
        .iter()
        .map(value_text)
        .map(|entry| (entry, flag.clone()))
        .collect()
}

fn search_text(template: &Template) -> Vec<String> {
    SEARCH_FIELDS
        .iter()
        .map(|key| match template.get(key) {
            Some(Value::Array(items)) => items.iter().map(value_text).collect::<Vec<_>>().join(" "),
            Some(value) => value_text(value),
            None => String::new(),
        })
        .filter(|text| !text.is_empty())
        .collect()
}

/// Templates whose searchable fields match `query`.
///
/// A blank query keeps every template.
pub fn filter_templates(templates: &[Template], query: &str, exact: bool) -> Vec<Template> {
    if query.trim().is_empty() {
        trace!("blank query, keeping all {} templates", templates.len());
        return templates.to_vec();
    }

    let matched: Vec<Template> = templates
        .par_iter()
        .filter(|template| filter_match(query, &search_text(template)[..], exact))
        .cloned()
        .collect();

    debug!(
        query = query,
        exact = exact,
        matched = matched.len(),
        "filtered templates"
    );
    matched
}
