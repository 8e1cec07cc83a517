//! Derived values shown next to an application in the catalog.

use std::{collections::HashSet, fs, sync::LazyLock};

use ca_config::Paths;
use ca_store::{xml_to_value, ATTRIBUTES_KEY, VALUE_KEY};
use ca_utils::{string::strip_tags, version::version_gt};
use regex::Regex;
use serde_json::Value;
use tracing::{debug, trace};

use crate::template::{value_text, Template};

/// Registry prefixes dropped before taking the owner from a repository.
const REGISTRY_PREFIXES: &[&str] = &["lscr.io/", "ghcr.io/", "registry.hub.docker.com/", "library/"];

/// Download counts reported as "More than N", largest first.
const DOWNLOAD_BUCKETS: &[u64] = &[
    500_000_000,
    100_000_000,
    50_000_000,
    25_000_000,
    10_000_000,
    5_000_000,
    2_500_000,
    1_000_000,
    500_000,
    250_000,
    100_000,
    50_000,
    25_000,
    10_000,
    5_000,
    1_000,
    500,
    100,
];

static BBCODE_BR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[br\s*/?\]").expect("unable to compile br regex"));

static BBCODE_BOLD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\[/?b\s*\]").expect("unable to compile bold regex"));

/// Who to credit for a template.
///
/// Plugins credit `PluginAuthor`, containers an explicit `Author`, and
/// otherwise the owner part of the repository.
pub fn get_author(template: &Template) -> String {
    if !template.is_blank("PluginURL") {
        return strip_tags(&template.text("PluginAuthor")).trim().to_string();
    }

    if !template.is_blank("Author") {
        return strip_tags(&template.text("Author")).trim().to_string();
    }

    let mut repository = template.text("Repository");
    for prefix in REGISTRY_PREFIXES {
        if let Some(rest) = repository.strip_prefix(prefix) {
            repository = rest.to_string();
        }
    }

    let owner = repository.split('/').next().unwrap_or_default();
    let owner = owner.split(':').next().unwrap_or_default();
    strip_tags(owner)
}

fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, c) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Rounds a download count down to a "More than N" bucket.
///
/// Counts under the smallest bucket are shown as-is when `low_flag` is set and
/// hidden otherwise.
pub fn get_downloads(count: u64, low_flag: bool) -> String {
    match DOWNLOAD_BUCKETS.iter().find(|&&bucket| count > bucket) {
        Some(&bucket) => format!("More than {}", thousands(bucket)),
        None if low_flag => count.to_string(),
        None => String::new(),
    }
}

/// Cleans a description for plain display: `[br]` becomes a newline, bold
/// markers and HTML tags go.
pub fn fix_description(description: Option<&str>) -> String {
    let Some(description) = description else {
        return String::new();
    };
    let text = BBCODE_BR_RE.replace_all(description, "\n");
    let text = BBCODE_BOLD_RE.replace_all(&text, "");
    strip_tags(&text).trim().to_string()
}

fn summarize(items: &[String], threshold: usize) -> String {
    if items.len() <= threshold {
        return items.join(", ");
    }
    format!("{} and {} more", items[..2].join(", "), items.len() - 2)
}

/// Human readable category list.
///
/// Categories are separated by spaces or commas; `Parent:` markers without a
/// child are dropped. Outside a popup only two categories are listed.
pub fn category_list(categories: &str, popup: bool) -> String {
    let mut seen = HashSet::new();
    let entries: Vec<String> = categories
        .split([' ', ','])
        .map(|c| c.trim().trim_end_matches(':'))
        .filter(|c| !c.is_empty())
        .map(|c| c.replace(':', ": "))
        .filter(|c| seen.insert(c.clone()))
        .collect();

    let threshold = if popup { usize::MAX } else { 2 };
    summarize(&entries, threshold)
}

/// Comma separated author list, collapsed after three names.
pub fn language_author_list(authors: &str) -> String {
    let entries: Vec<String> = authors
        .split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(String::from)
        .collect();
    summarize(&entries, 3)
}

fn config_entries(template: &Template) -> Vec<&Value> {
    match template.get("Config") {
        Some(Value::Array(items)) => items.iter().collect(),
        Some(entry @ Value::Object(_)) => vec![entry],
        _ => Vec::new(),
    }
}

fn network_mode(template: &Template) -> String {
    match template.get("Network") {
        Some(Value::Object(map)) => map.get(VALUE_KEY).map(value_text).unwrap_or_default(),
        Some(value) => value_text(value),
        None => String::new(),
    }
}

/// Host ports a bridge-networked container publishes.
///
/// Each `Port` config contributes its value, or its default when the value is
/// empty. Other network modes publish nothing.
pub fn ports_used(template: &Template) -> Vec<String> {
    if !network_mode(template).eq_ignore_ascii_case("bridge") {
        return Vec::new();
    }

    config_entries(template)
        .into_iter()
        .filter_map(|entry| {
            let attributes = entry.get(ATTRIBUTES_KEY)?;
            if attributes.get("Type").and_then(Value::as_str) != Some("Port") {
                return None;
            }
            let value = entry.get(VALUE_KEY).map(value_text).unwrap_or_default();
            let port = if value.trim().is_empty() {
                attributes.get("Default").map(value_text).unwrap_or_default()
            } else {
                value
            };
            let port = port.trim().to_string();
            (!port.is_empty()).then_some(port)
        })
        .collect()
}

/// Whether a newer version of an installed language pack is available.
pub fn language_check(template: &Template, paths: &Paths) -> bool {
    if template.is_blank("LanguageURL") {
        return false;
    }

    let pack = template.text("LanguagePack");
    let installed = paths.installed_languages.join(format!("lang-{pack}.xml"));
    let Ok(content) = fs::read_to_string(&installed) else {
        trace!("language pack {} is not installed", pack);
        return false;
    };

    let installed_version = match xml_to_value(&content) {
        Ok(map) => map.get("Version").map(value_text).unwrap_or_default(),
        Err(err) => {
            debug!("unreadable language file {}: {}", installed.display(), err);
            return false;
        }
    };

    version_gt(&template.text("Version"), &installed_version)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::tempdir;

    use super::*;

    fn template(value: Value) -> Template {
        Template::try_from(value).unwrap()
    }

    #[test]
    fn test_get_author() {
        assert_eq!(
            get_author(&template(json!({
                "PluginURL": "https://example.com/plugin.plg",
                "PluginAuthor": "John Doe"
            }))),
            "John Doe"
        );
        assert_eq!(
            get_author(&template(json!({"Repository": "linuxserver/plex"}))),
            "linuxserver"
        );
        assert_eq!(
            get_author(&template(json!({"Repository": "ghcr.io/linuxserver/plex"}))),
            "linuxserver"
        );
        assert_eq!(
            get_author(&template(json!({"Repository": "library/nginx"}))),
            "nginx"
        );
        assert_eq!(
            get_author(&template(json!({"Repository": "mariadb:10"}))),
            "mariadb"
        );
        assert_eq!(
            get_author(&template(json!({
                "Author": "Jane Smith",
                "Repository": "someuser/someimage"
            }))),
            "Jane Smith"
        );
        assert_eq!(
            get_author(&template(json!({"Author": "<b>Styled</b> Author"}))),
            "Styled Author"
        );
    }

    #[test]
    fn test_get_downloads() {
        assert_eq!(get_downloads(15_000_000, false), "More than 10,000,000");
        assert_eq!(get_downloads(1_500_000, false), "More than 1,000,000");
        assert_eq!(get_downloads(5_500, false), "More than 5,000");
        assert_eq!(get_downloads(100, false), "");
        assert_eq!(get_downloads(50, true), "50");
        assert_eq!(get_downloads(50, false), "");
    }

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(100), "100");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(500_000_000), "500,000,000");
    }

    #[test]
    fn test_fix_description() {
        assert_eq!(fix_description(Some("Line one[br]Line two")), "Line one\nLine two");
        assert_eq!(fix_description(Some("[b]Bold text[/b]")), "Bold text");
        let cleaned = fix_description(Some("<script>alert(\"xss\")</script>Normal text"));
        assert!(!cleaned.contains("<script>"));
        assert!(cleaned.contains("Normal text"));
        assert_eq!(fix_description(None), "");
        assert_eq!(fix_description(Some("  Padded text  ")), "Padded text");
    }

    #[test]
    fn test_category_list() {
        assert_eq!(category_list("Media", false), "Media");
        assert_eq!(category_list(" Media , Server ", false), "Media, Server");
        assert_eq!(
            category_list("Media,Server,Docker", false),
            "Media, Server and 1 more"
        );
        assert_eq!(
            category_list("Media,Server,Docker", true),
            "Media, Server, Docker"
        );
        assert_eq!(category_list("Media: Server", false), "Media, Server");
        assert_eq!(
            category_list("MediaApp:Video Tools:", false),
            "MediaApp: Video, Tools"
        );
        assert_eq!(category_list("Tools Tools", false), "Tools");
    }

    #[test]
    fn test_language_author_list() {
        assert_eq!(language_author_list("John Doe"), "John Doe");
        assert_eq!(
            language_author_list("Author1, Author2, Author3"),
            "Author1, Author2, Author3"
        );
        assert_eq!(language_author_list("A1, A2, A3, A4, A5"), "A1, A2 and 3 more");
    }

    #[test]
    fn test_ports_used() {
        let host = template(json!({"Network": "host", "Config": []}));
        assert!(ports_used(&host).is_empty());

        let bridge = template(json!({
            "Network": "bridge",
            "Config": [
                {"@attributes": {"Type": "Port", "Default": "8080"}, "value": ""},
                {"@attributes": {"Type": "Path"}, "value": "/data"},
                {"@attributes": {"Type": "Port", "Default": "443"}, "value": "8443"}
            ]
        }));
        assert_eq!(ports_used(&bridge), vec!["8080", "8443"]);

        let single = template(json!({
            "Network": {"@attributes": {"Default": "bridge"}, "value": "bridge"},
            "Config": {"@attributes": {"Type": "Port"}, "value": "9000"}
        }));
        assert_eq!(ports_used(&single), vec!["9000"]);
    }

    #[test]
    fn test_language_check() {
        let dir = tempdir().unwrap();
        let mut paths = Paths::rooted(dir.path(), dir.path());
        paths.installed_languages = dir.path().to_path_buf();

        assert!(!language_check(&template(json!({"LanguageURL": ""})), &paths));

        let pack = template(json!({
            "LanguageURL": "https://example.com/lang.xml",
            "LanguagePack": "de_DE",
            "Version": "2024.02.01"
        }));
        assert!(!language_check(&pack, &paths));

        let installed = dir.path().join("lang-de_DE.xml");
        fs::write(&installed, "<Language><Version>2024.01.01</Version></Language>").unwrap();
        assert!(language_check(&pack, &paths));

        fs::write(&installed, "<Language><Version>2024.02.01</Version></Language>").unwrap();
        assert!(!language_check(&pack, &paths));
    }
}
