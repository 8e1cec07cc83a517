use std::{fs, path::Path};

/// Reads the OS version from an Unraid `unraid-version` file.
///
/// The file holds a single shell assignment such as `version="7.0.0"`. Returns `None` when the
/// file is missing or carries no version line.
pub fn read_os_version<P: AsRef<Path>>(path: P) -> Option<String> {
    let content = fs::read_to_string(path).ok()?;
    parse_os_version(&content)
}

fn parse_os_version(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let (key, value) = line.split_once('=')?;
        if key.trim() != "version" {
            return None;
        }
        let value = value.trim().trim_matches('"').trim_matches('\'');
        (!value.is_empty()).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_os_version() {
        assert_eq!(parse_os_version("version=\"7.0.0\"\n"), Some("7.0.0".into()));
        assert_eq!(
            parse_os_version("# comment\nversion='6.12.0-rc1'"),
            Some("6.12.0-rc1".into())
        );
        assert_eq!(parse_os_version("version=\"\""), None);
        assert_eq!(parse_os_version("nothing here"), None);
    }

    #[test]
    fn test_read_os_version() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("unraid-version");
        fs::write(&file, "version=\"7.0.0\"\n").unwrap();

        assert_eq!(read_os_version(&file), Some("7.0.0".into()));
        assert_eq!(read_os_version(dir.path().join("missing")), None);
    }
}
