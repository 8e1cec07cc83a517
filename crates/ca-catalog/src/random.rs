use ca_config::Settings;
use ca_template::Template;
use tracing::trace;

/// Name of the catalog's own application, which is never suggested.
pub const SELF_APP_NAME: &str = "Community Applications";

/// Whether a template may be picked as a random suggestion.
///
/// The catalog itself, branch templates, hidden and blacklisted apps are
/// always skipped. Incompatible and deprecated apps are skipped when the
/// matching setting hides them.
pub fn check_random_app(template: &Template, settings: &Settings) -> bool {
    let name = template.str_of("Name");

    let reason = if name == SELF_APP_NAME {
        Some("self")
    } else if !template.is_blank("BranchName") {
        Some("branch")
    } else if !template.flag("Displayable") {
        Some("not displayable")
    } else if template.flag("Blacklist") {
        Some("blacklisted")
    } else if settings.hide_incompatible && !template.flag("Compatible") {
        Some("incompatible")
    } else if settings.hide_deprecated && template.flag("Deprecated") {
        Some("deprecated")
    } else {
        None
    };

    match reason {
        Some(reason) => {
            trace!(name = name, reason = reason, "not eligible as random app");
            false
        }
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;

    fn app(overrides: Value) -> Template {
        let mut template = Template::try_from(json!({
            "Name": "Test App",
            "Displayable": true,
            "Compatible": true,
            "Blacklist": false,
            "Deprecated": false
        }))
        .unwrap();
        if let Value::Object(map) = overrides {
            for (key, value) in map {
                template.set(key, value);
            }
        }
        template
    }

    fn settings(hide_incompatible: bool, hide_deprecated: bool) -> Settings {
        Settings {
            hide_incompatible,
            hide_deprecated,
            ..Settings::default()
        }
    }

    #[test]
    fn test_allows_valid_app() {
        let defaults = settings(false, false);
        assert!(check_random_app(&app(json!({"Name": "Awesome Docker App"})), &defaults));
        assert!(check_random_app(&app(json!({})), &defaults));
    }

    #[test]
    fn test_always_rejected() {
        let defaults = settings(false, false);
        assert!(!check_random_app(&app(json!({"Name": "Community Applications"})), &defaults));
        assert!(!check_random_app(&app(json!({"BranchName": "beta"})), &defaults));
        assert!(!check_random_app(&app(json!({"Displayable": false})), &defaults));
        assert!(!check_random_app(&app(json!({"Blacklist": true})), &defaults));
    }

    #[test]
    fn test_incompatible_depends_on_setting() {
        let incompatible = app(json!({"Compatible": false}));
        assert!(!check_random_app(&incompatible, &settings(true, false)));
        assert!(check_random_app(&incompatible, &settings(false, false)));
    }

    #[test]
    fn test_deprecated_depends_on_setting() {
        let deprecated = app(json!({"Deprecated": true}));
        assert!(!check_random_app(&deprecated, &settings(false, true)));
        assert!(check_random_app(&deprecated, &settings(false, false)));
    }
}
