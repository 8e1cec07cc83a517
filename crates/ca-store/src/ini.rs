//! INI files as used by plugin settings (`key="value"` lines with optional
//! `[section]` headers).

use std::{fs, path::Path};

use ca_utils::fs::write_atomic;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{ErrorContext, Result};

fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "1".into(),
        Value::Bool(false) => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Renders a map in INI form.
///
/// Scalar entries become `key="value"` lines. Map entries become a
/// `[section]` header followed by their own keys.
pub fn format_ini(map: &Map<String, Value>) -> String {
    let mut out = String::new();
    for (key, value) in map {
        match value {
            Value::Object(section) => {
                out.push_str(&format!("[{key}]\n"));
                for (inner, inner_value) in section {
                    out.push_str(&format!("{inner}=\"{}\"\n", scalar_text(inner_value)));
                }
            }
            Value::Array(items) => {
                out.push_str(&format!("[{key}]\n"));
                for (idx, item) in items.iter().enumerate() {
                    out.push_str(&format!("{idx}=\"{}\"\n", scalar_text(item)));
                }
            }
            scalar => out.push_str(&format!("{key}=\"{}\"\n", scalar_text(scalar))),
        }
    }
    out
}

/// Writes `map` to `path` in INI form through an atomic rename.
pub fn write_ini_file<P: AsRef<Path>>(path: P, map: &Map<String, Value>) -> Result<usize> {
    let path = path.as_ref();
    let written = write_atomic(path, format_ini(map).as_bytes())?;
    debug!("wrote ini file {} ({} bytes)", path.display(), written);
    Ok(written)
}

fn unquote(raw: &str) -> &str {
    let raw = raw.trim();
    for quote in ['"', '\''] {
        if raw.len() >= 2 && raw.starts_with(quote) && raw.ends_with(quote) {
            return &raw[1..raw.len() - 1];
        }
    }
    raw
}

/// Parses INI text into a map of strings, with sections as nested maps.
///
/// Quotes around values are optional. Lines starting with `;` or `#` and
/// lines without `=` are ignored.
pub fn parse_ini(content: &str) -> Map<String, Value> {
    let mut root = Map::new();
    let mut section: Option<String> = None;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            let name = name.trim().to_string();
            root.entry(name.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            section = Some(name);
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim().to_string();
        let value = Value::String(unquote(value).to_string());

        let target = match &section {
            Some(name) => root.get_mut(name).and_then(Value::as_object_mut),
            None => Some(&mut root),
        };
        if let Some(target) = target {
            target.insert(key, value);
        }
    }

    root
}

/// Reads and parses an INI file.
pub fn read_ini_file<P: AsRef<Path>>(path: P) -> Result<Map<String, Value>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading ini file {}", path.display()))?;
    Ok(parse_ini(&content))
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::tempdir;

    use super::*;

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected a map"),
        }
    }

    #[test]
    fn test_format_flat() {
        let map = as_map(json!({"maxPerPage": 24, "dev": "no", "hide": true, "off": false}));
        assert_eq!(
            format_ini(&map),
            "maxPerPage=\"24\"\ndev=\"no\"\nhide=\"1\"\noff=\"\"\n"
        );
    }

    #[test]
    fn test_format_sections() {
        let map = as_map(json!({"top": "x", "sec": {"a": "1", "b": "2"}}));
        assert_eq!(format_ini(&map), "top=\"x\"\n[sec]\na=\"1\"\nb=\"2\"\n");
    }

    #[test]
    fn test_parse() {
        let text = "; comment\n# other\nname=\"value\"\nbare = plain \n\n[sec]\nk='v'\nnoequals\n";
        let map = parse_ini(text);
        assert_eq!(
            Value::Object(map),
            json!({"name": "value", "bare": "plain", "sec": {"k": "v"}})
        );
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("settings.cfg");
        let map = as_map(json!({"a": "1", "s": {"b": "two words"}}));

        write_ini_file(&file, &map).unwrap();
        assert_eq!(read_ini_file(&file).unwrap(), map);
        assert!(read_ini_file(dir.path().join("missing.cfg")).is_err());
    }
}
