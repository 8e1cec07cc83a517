//! Probes of the environment a request arrives in.

use std::{collections::HashMap, sync::LazyLock};

use ca_config::Paths;
use ca_utils::string::url_decode;
use regex::Regex;
use tracing::trace;

static MOBILE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(android|avantgo|blackberry|bolt|boost|cricket|docomo|fone|hiptop|mini|mobi|palm|phone|pie|tablet|up\.browser|up\.link|webos|wos)",
    )
    .expect("unable to compile mobile regex")
});

/// Plugin files whose presence means Tailscale is installed.
const TAILSCALE_PLUGINS: &[&str] = &["tailscale.plg", "tailscale-preview.plg"];

/// Whether a user agent belongs to a phone or tablet.
pub fn is_mobile(user_agent: &str) -> bool {
    MOBILE_RE.is_match(user_agent)
}

pub fn is_tailscale_installed(paths: &Paths) -> bool {
    TAILSCALE_PLUGINS.iter().any(|plugin| {
        let installed = paths.installed_plugins.join(plugin).is_file();
        trace!(plugin = plugin, installed = installed, "tailscale probe");
        installed
    })
}

/// URL-decoded form value for `key`, or `default` when it was not posted.
pub fn get_post(params: &HashMap<String, String>, key: &str, default: &str) -> String {
    params
        .get(key)
        .map(|value| url_decode(value))
        .unwrap_or_else(|| default.to_string())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_is_mobile() {
        assert!(is_mobile(
            "Mozilla/5.0 (iPhone; CPU iPhone OS 16_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.0 Mobile/15E148 Safari/604.1"
        ));
        assert!(is_mobile(
            "Mozilla/5.0 (Linux; Android 13; Pixel 7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/116.0.0.0 Mobile Safari/537.36"
        ));
        assert!(is_mobile(
            "Mozilla/5.0 (BlackBerry; U; BlackBerry 9900; en) AppleWebKit/534.11+ (KHTML, like Gecko) Version/7.1.0.346 Mobile Safari/534.11+"
        ));
        assert!(is_mobile(
            "Mozilla/5.0 (iPad; CPU OS 16_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Mobile/15E148"
        ));
        assert!(!is_mobile(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/116.0.0.0 Safari/537.36"
        ));
        assert!(!is_mobile(""));
    }

    #[test]
    fn test_tailscale_detection() {
        let dir = tempdir().unwrap();
        let mut paths = Paths::rooted(dir.path(), dir.path());
        paths.installed_plugins = dir.path().join("plugins");
        fs::create_dir_all(&paths.installed_plugins).unwrap();

        assert!(!is_tailscale_installed(&paths));

        let preview = paths.installed_plugins.join("tailscale-preview.plg");
        fs::write(&preview, "").unwrap();
        assert!(is_tailscale_installed(&paths));
        fs::remove_file(&preview).unwrap();

        fs::write(paths.installed_plugins.join("tailscale.plg"), "").unwrap();
        assert!(is_tailscale_installed(&paths));
    }

    #[test]
    fn test_get_post() {
        let mut params = HashMap::new();
        params.insert("testKey".to_string(), "test%20value".to_string());

        assert_eq!(get_post(&params, "testKey", "default"), "test value");
        assert_eq!(get_post(&params, "nonexistent", "default value"), "default value");
    }
}
