//! Turns field docs into comments in the generated config file.

use std::any::type_name;

use documented::{Documented, DocumentedFields};
use toml_edit::{Decor, Item, RawString, Table};
use tracing::debug;

use crate::error::{ConfigError, Result};

fn comment_block(docs: &str) -> String {
    docs.lines()
        .map(|line| match line {
            "" => "#\n".to_string(),
            text => format!("# {text}\n"),
        })
        .collect()
}

/// Adds `docs` as `#` comment lines to whatever already precedes the item.
pub fn append_docs_as_toml_comments(decor: &mut Decor, docs: &str) {
    let mut prefix = decor
        .prefix()
        .and_then(RawString::as_str)
        .unwrap_or_default()
        .to_string();
    if !prefix.is_empty() && !prefix.ends_with('\n') {
        prefix.push('\n');
    }
    prefix.push_str(&comment_block(docs));
    decor.set_prefix(prefix);
}

fn item_decor<'a>(key_decor: &'a mut Decor, item: &'a mut Item) -> Option<&'a mut Decor> {
    match item {
        Item::Value(_) => Some(key_decor),
        Item::Table(table) => Some(table.decor_mut()),
        Item::ArrayOfTables(array) => array.iter_mut().next().map(Table::decor_mut),
        Item::None => None,
    }
}

/// Documents every key of `table` from the field docs of `T`.
///
/// Nested tables also get the doc of `T` itself above their header; the root
/// table does not.
pub fn annotate_toml_table<T>(table: &mut Table, is_root: bool) -> Result<()>
where
    T: Documented + DocumentedFields,
{
    if !is_root {
        append_docs_as_toml_comments(table.decor_mut(), T::DOCS);
    }

    for (mut key, item) in table.iter_mut() {
        let name = key.get().to_string();
        let Ok(docs) = T::get_field_docs(&name) else {
            debug!("no docs for `{}` on {}", name, type_name::<T>());
            continue;
        };
        let decor = item_decor(key.leaf_decor_mut(), item)
            .ok_or_else(|| ConfigError::UnexpectedTomlItem(name.clone()))?;
        append_docs_as_toml_comments(decor, docs);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use toml_edit::{DocumentMut, Decor};

    use super::*;
    use crate::config::{Config, SortConfig};

    fn prefix(decor: &Decor) -> &str {
        decor.prefix().and_then(|p| p.as_str()).unwrap()
    }

    #[test]
    fn test_comment_block() {
        assert_eq!(comment_block("One\n\nTwo"), "# One\n#\n# Two\n");
    }

    #[test]
    fn test_append_docs_to_empty_prefix() {
        let mut decor = Decor::new("", "");
        append_docs_as_toml_comments(&mut decor, "Scratch directory");
        assert_eq!(prefix(&decor), "# Scratch directory\n");
    }

    #[test]
    fn test_append_docs_keeps_existing_prefix() {
        let mut decor = Decor::new("# existing\n", "");
        append_docs_as_toml_comments(&mut decor, "Added");
        assert_eq!(prefix(&decor), "# existing\n# Added\n");

        let mut decor = Decor::new("# no newline", "");
        append_docs_as_toml_comments(&mut decor, "Added");
        assert_eq!(prefix(&decor), "# no newline\n# Added\n");
    }

    #[test]
    fn test_annotate_config() {
        let mut doc = toml::to_string_pretty(&Config::default_config())
            .unwrap()
            .parse::<DocumentMut>()
            .unwrap();
        annotate_toml_table::<Config>(doc.as_table_mut(), true).unwrap();
        if let Some(sort) = doc.get_mut("sort").and_then(Item::as_table_mut) {
            annotate_toml_table::<SortConfig>(sort, false).unwrap();
        }

        let rendered = doc.to_string();
        assert!(rendered.contains("# Directory holding the .plg file"));
        assert!(rendered.contains("# Default: /etc/unraid-version"));
    }
}
