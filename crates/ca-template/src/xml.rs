//! Reading and writing container templates as XML.

use std::{fs, path::Path, sync::LazyLock};

use ca_store::{value_to_xml, xml_to_value, ATTRIBUTES_KEY, VALUE_KEY};
use ca_utils::string::strip_tags;
use regex::Regex;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::{
    display::get_author,
    error::{Result, TemplateError},
    template::{truthy, Template},
};

static BR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("unable to compile br regex"));

static REQUIRES_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"//(.*?)\\\\").expect("unable to compile requires link regex")
});

/// Keys every non-generic template carries, null when the XML lacks them.
pub const STANDARD_KEYS: &[&str] = &[
    "Name",
    "Author",
    "Repository",
    "Registry",
    "Category",
    "Overview",
    "Description",
    "Icon",
    "Support",
    "Project",
    "ReadMe",
    "Changes",
    "MinVer",
    "MaxVer",
    "Date",
    "FirstSeen",
    "Beta",
    "Blacklist",
    "Deprecated",
    "DeprecatedMaxVer",
    "ModeratorComment",
    "Plugin",
    "PluginURL",
    "PluginAuthor",
    "Repo",
    "RepoName",
    "Network",
    "Config",
    "Requires",
    "IncompatibleVersion",
    "LanguageURL",
    "LanguagePack",
    "DonateText",
    "DonateLink",
    "Screenshot",
    "Video",
];

/// Inserts null for every standard key missing from a template map.
///
/// Anything that is not a map is returned unchanged.
pub fn add_missing_vars(value: Value) -> Value {
    match value {
        Value::Object(mut map) => {
            for key in STANDARD_KEYS {
                map.entry(*key).or_insert(Value::Null);
            }
            Value::Object(map)
        }
        other => other,
    }
}

/// Normalizes an attribute-bearing list such as `Config` or `Network`.
///
/// A single `{@attributes, value}` entry becomes a one-element list and every
/// list entry is reduced to its `@attributes` plus a non-empty `value`.
/// Absent keys, scalars and maps without attributes are left alone.
pub fn fix_attributes(template: &mut Template, key: &str) {
    let Some(current) = template.get_mut(key) else {
        return;
    };

    let entries = match current {
        Value::Object(map) if map.contains_key(ATTRIBUTES_KEY) => vec![Value::Object(map.clone())],
        Value::Array(items) => items.clone(),
        _ => return,
    };

    let normalized = entries
        .into_iter()
        .map(|entry| {
            let mut fixed = Map::new();
            let (attributes, value) = match entry {
                Value::Object(mut map) => (
                    map.shift_remove(ATTRIBUTES_KEY),
                    map.shift_remove(VALUE_KEY),
                ),
                scalar => (None, Some(scalar)),
            };
            fixed.insert(
                ATTRIBUTES_KEY.into(),
                attributes.unwrap_or_else(|| Value::Object(Map::new())),
            );
            if let Some(value) = value.filter(truthy) {
                fixed.insert(VALUE_KEY.into(), value);
            }
            Value::Object(fixed)
        })
        .collect();

    *current = Value::Array(normalized);
}

/// Turns `<br>` variants into newlines and strips all other markup from
/// every string, descending into lists and maps.
pub fn remove_xml_tags(value: &mut Value) {
    match value {
        Value::String(s) => {
            let cleaned = strip_tags(&BR_RE.replace_all(s, "\n"));
            *s = cleaned;
        }
        Value::Array(items) => items.iter_mut().for_each(remove_xml_tags),
        Value::Object(map) => map.values_mut().for_each(remove_xml_tags),
        _ => {}
    }
}

/// Reads and parses a template file.
///
/// In generic mode the raw mapping is returned. Otherwise the template is
/// completed with the standard keys and the fields derived from them.
pub fn load_xml_file<P: AsRef<Path>>(path: P, generic: bool) -> Result<Template> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|err| {
        TemplateError::Read {
            path: path.display().to_string(),
            source: err,
        }
    })?;
    let mut template = Template::from(xml_to_value(&content)?);
    debug!("parsed template {}", path.display());

    if generic {
        return Ok(template);
    }

    template = Template::try_from(add_missing_vars(std::mem::take(&mut template).into_value()))
        .unwrap_or_default();

    template.set("Path", path.display().to_string());
    let author = get_author(&template);
    template.set("Author", author.clone());
    template.set("SortAuthor", author);
    let name = template.text("Name");
    template.set("SortName", name.replace('-', " "));
    template.set("DockerHubName", name.to_lowercase());

    if template.is_blank("Overview") {
        if let Some(description) = template.get("Description").cloned() {
            template.set("Overview", description);
        }
    }

    fix_attributes(&mut template, "Config");
    fix_attributes(&mut template, "Network");

    Ok(template)
}

/// Reads a template file, returning `None` when it is missing or malformed.
pub fn read_xml_file<P: AsRef<Path>>(path: P, generic: bool) -> Option<Template> {
    let path = path.as_ref();
    match load_xml_file(path, generic) {
        Ok(template) => Some(template),
        Err(err) => {
            warn!("ignoring template {}: {}", path.display(), err);
            None
        }
    }
}

/// Renders a template as a `<Container>` XML document.
pub fn make_xml(template: &Template) -> String {
    let mut template = template.clone();

    if template.contains_key("Config") && !template.contains_key(ATTRIBUTES_KEY) {
        template.set(ATTRIBUTES_KEY, json!({"version": "2"}));
    }

    fix_attributes(&mut template, "Network");
    fix_attributes(&mut template, "Config");

    if let Some(Value::String(requires)) = template.get_mut("Requires") {
        *requires = REQUIRES_LINK_RE.replace_all(requires, "$1").into_owned();
    }

    if !template.is_blank("Overview") {
        let overview = template.text("Overview");
        template.set("Description", overview);
    }

    value_to_xml("Container", template.as_map())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use tempfile::tempdir;

    use super::*;

    fn template(value: Value) -> Template {
        Template::try_from(value).unwrap()
    }

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let file = dir.join(name);
        fs::write(&file, content).unwrap();
        file
    }

    const SIMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Container>
    <Name>Test-App</Name>
    <Repository>user/repo</Repository>
    <Description>A test application</Description>
</Container>"#;

    #[test]
    fn test_read_xml_file() {
        let dir = tempdir().unwrap();
        let file = write(dir.path(), "template.xml", SIMPLE);

        let t = read_xml_file(&file, false).unwrap();
        assert_eq!(t.str_of("Name"), "Test-App");
        assert_eq!(t.str_of("Repository"), "user/repo");
        assert_eq!(t.str_of("Path"), file.display().to_string());
        assert_eq!(t.str_of("Author"), "user");
        assert_eq!(t.str_of("SortAuthor"), "user");
        assert_eq!(t.str_of("SortName"), "Test App");
        assert_eq!(t.str_of("DockerHubName"), "test-app");
        assert_eq!(t.str_of("Overview"), "A test application");
        assert_eq!(t.get("Category"), Some(&Value::Null));
    }

    #[test]
    fn test_read_xml_file_generic() {
        let dir = tempdir().unwrap();
        let file = write(dir.path(), "template.xml", SIMPLE);

        let t = read_xml_file(&file, true).unwrap();
        assert_eq!(t.str_of("Name"), "Test-App");
        assert!(!t.contains_key("Path"));
        assert!(!t.contains_key("Category"));
        assert!(!t.contains_key("Overview"));
    }

    #[test]
    fn test_read_xml_file_failures() {
        let dir = tempdir().unwrap();
        assert!(read_xml_file(dir.path().join("missing.xml"), false).is_none());

        let invalid = write(dir.path(), "invalid.xml", "not xml content");
        assert!(read_xml_file(&invalid, false).is_none());
        assert!(matches!(
            load_xml_file(&invalid, false),
            Err(TemplateError::Store(_))
        ));
    }

    #[test]
    fn test_read_xml_file_config_attributes() {
        let dir = tempdir().unwrap();
        let file = write(
            dir.path(),
            "config.xml",
            r#"<Container>
                <Name>TestApp</Name>
                <Config Type="Port" Default="8080">8080</Config>
            </Container>"#,
        );

        let t = read_xml_file(&file, false).unwrap();
        assert_eq!(
            t.get("Config"),
            Some(&json!([{"@attributes": {"Type": "Port", "Default": "8080"}, "value": "8080"}]))
        );
    }

    #[test]
    fn test_add_missing_vars() {
        let value = add_missing_vars(json!({"Name": "Test App", "MinVer": "6.10"}));
        assert_eq!(value["Name"], json!("Test App"));
        assert_eq!(value["MinVer"], json!("6.10"));
        assert_eq!(value["Category"], Value::Null);
        assert!(value.get("Path").is_none());

        assert_eq!(add_missing_vars(json!("string")), json!("string"));
        assert_eq!(add_missing_vars(Value::Null), Value::Null);
    }

    #[test]
    fn test_fix_attributes() {
        let mut t = template(json!({
            "Config": {"@attributes": {"Type": "Port"}, "value": "8080"},
            "Network": "bridge",
            "Other": [{"@attributes": {"a": "1"}, "value": ""}, "text"]
        }));

        fix_attributes(&mut t, "Config");
        fix_attributes(&mut t, "Network");
        fix_attributes(&mut t, "Other");
        fix_attributes(&mut t, "Missing");

        assert_eq!(
            t.get("Config"),
            Some(&json!([{"@attributes": {"Type": "Port"}, "value": "8080"}]))
        );
        assert_eq!(t.str_of("Network"), "bridge");
        assert_eq!(
            t.get("Other"),
            Some(&json!([{"@attributes": {"a": "1"}}, {"@attributes": {}, "value": "text"}]))
        );
        assert!(!t.contains_key("Missing"));
    }

    #[test]
    fn test_remove_xml_tags() {
        let mut value = json!({
            "Description": "Line 1<br>Line 2<BR />Line 3",
            "App": {"Name": "<i>Styled</i>", "List": ["<b>Bold</b> text"]},
            "Count": 3
        });
        remove_xml_tags(&mut value);
        assert_eq!(
            value,
            json!({
                "Description": "Line 1\nLine 2\nLine 3",
                "App": {"Name": "Styled", "List": ["Bold text"]},
                "Count": 3
            })
        );
    }

    #[test]
    fn test_make_xml() {
        let xml = make_xml(&template(json!({
            "Name": "TestApp",
            "Repository": "test/app",
            "Overview": "My app overview"
        })));
        assert!(xml.starts_with("<?xml"));
        assert!(xml.contains("<Container>"));
        assert!(xml.contains("<Name>TestApp</Name>"));
        assert!(xml.contains("<Description>My app overview</Description>"));
    }

    #[test]
    fn test_make_xml_config_and_network() {
        let xml = make_xml(&template(json!({
            "Name": "TestApp",
            "Network": {"@attributes": {"Default": "bridge"}},
            "Config": {"@attributes": {"Type": "Port"}, "value": "8080"}
        })));
        assert!(xml.contains("<Container version=\"2\">"));
        assert!(xml.contains("<Network Default=\"bridge\"/>"));
        assert!(xml.contains("<Config Type=\"Port\">8080</Config>"));
    }

    #[test]
    fn test_make_xml_requires_links() {
        let xml = make_xml(&template(json!({
            "Name": "TestApp",
            "Requires": "Needs //search_term\\\\ installed"
        })));
        assert!(xml.contains("<Requires>Needs search_term installed</Requires>"));
    }

    #[test]
    fn test_make_then_read() {
        let dir = tempdir().unwrap();
        let source = template(json!({
            "Name": "RoundTrip",
            "Repository": "ghcr.io/owner/image:latest",
            "Overview": "Overview & more",
            "Config": [
                {"@attributes": {"Name": "WebUI", "Type": "Port", "Default": "80"}, "value": "8080"},
                {"@attributes": {"Name": "Data", "Type": "Path"}}
            ]
        }));
        let file = write(dir.path(), "roundtrip.xml", &make_xml(&source));

        let t = read_xml_file(&file, false).unwrap();
        assert_eq!(t.str_of("Author"), "owner");
        assert_eq!(t.str_of("Description"), "Overview & more");
        assert_eq!(t.get("Config"), source.get("Config"));
    }
}
