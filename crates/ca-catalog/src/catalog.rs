use std::{
    path::{Path, PathBuf},
    sync::OnceLock,
};

use ca_config::Paths;
use ca_store::read_json_file;
use ca_template::Template;
use serde_json::Value;
use tracing::{debug, trace, warn};

/// The list of every known template.
///
/// The backing file is read on first access and never again; a catalog built
/// with [`Catalog::with_templates`] never touches the filesystem.
#[derive(Debug)]
pub struct Catalog {
    source: PathBuf,
    templates: OnceLock<Vec<Template>>,
}

impl Catalog {
    /// A catalog backed by the cached templates file.
    pub fn new(paths: &Paths) -> Self {
        Self::from_file(&paths.templates_info)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Self {
        Self {
            source: path.as_ref().to_path_buf(),
            templates: OnceLock::new(),
        }
    }

    /// A catalog that is already populated.
    pub fn with_templates(templates: Vec<Template>) -> Self {
        Self {
            source: PathBuf::new(),
            templates: OnceLock::from(templates),
        }
    }

    /// Returns the templates, loading them on first call.
    ///
    /// A missing or unreadable file yields an empty catalog.
    pub fn get_globals(&self) -> &[Template] {
        self.templates.get_or_init(|| load_templates(&self.source))
    }

    pub fn templates(&self) -> &[Template] {
        self.get_globals()
    }

    pub fn is_loaded(&self) -> bool {
        self.templates.get().is_some()
    }

    pub fn len(&self) -> usize {
        self.get_globals().len()
    }

    pub fn is_empty(&self) -> bool {
        self.get_globals().is_empty()
    }
}

fn load_templates(path: &Path) -> Vec<Template> {
    debug!(path = %path.display(), "loading template catalog");

    let entries = match read_json_file(path) {
        Value::Array(items) => items,
        Value::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
        _ => Vec::new(),
    };

    let templates: Vec<Template> = entries
        .into_iter()
        .enumerate()
        .filter_map(|(idx, entry)| match Template::try_from(entry) {
            Ok(template) => Some(template),
            Err(rejected) => {
                warn!(index = idx, "skipping catalog entry that is not a map: {}", rejected);
                None
            }
        })
        .collect();

    trace!(count = templates.len(), "template catalog loaded");
    templates
}

#[cfg(test)]
mod tests {
    use std::fs;

    use serde_json::json;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_loads_serialized_file() {
        let dir = tempdir().unwrap();
        let paths = Paths::rooted(dir.path(), dir.path());
        fs::write(
            &paths.templates_info,
            r#"a:2:{i:0;a:2:{s:4:"Name";s:8:"TestApp1";s:10:"Repository";s:9:"test/app1";}i:1;a:2:{s:4:"Name";s:8:"TestApp2";s:10:"Repository";s:9:"test/app2";}}"#,
        )
        .unwrap();

        let catalog = Catalog::new(&paths);
        assert!(!catalog.is_loaded());
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.templates()[0].str_of("Name"), "TestApp1");
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let catalog = Catalog::from_file(dir.path().join("templates.json"));
        assert!(catalog.is_empty());
        assert!(catalog.is_loaded());
    }

    #[test]
    fn test_loads_once() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("templates.json");
        fs::write(&file, r#"[{"Name": "First"}]"#).unwrap();

        let catalog = Catalog::from_file(&file);
        assert_eq!(catalog.templates()[0].str_of("Name"), "First");

        fs::write(&file, r#"[{"Name": "Second"}]"#).unwrap();
        assert_eq!(catalog.templates()[0].str_of("Name"), "First");
    }

    #[test]
    fn test_prepopulated_catalog_ignores_file() {
        let catalog = Catalog::with_templates(vec![
            Template::try_from(json!({"Name": "AlreadyLoaded"})).unwrap()
        ]);
        assert!(catalog.is_loaded());
        assert_eq!(catalog.templates()[0].str_of("Name"), "AlreadyLoaded");
    }

    #[test]
    fn test_skips_non_map_entries() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("templates.json");
        fs::write(&file, r#"[{"Name": "Ok"}, "stray", 3]"#).unwrap();
        assert_eq!(Catalog::from_file(&file).len(), 1);
    }
}
