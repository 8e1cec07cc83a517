//! Resolution of configured locations.
//!
//! Paths in the config file and in `CA_*` variables may use `~` and `$VAR` or
//! `${VAR}` references. Relative paths are anchored at the working directory.

use std::{borrow::Cow, env, path::PathBuf, sync::LazyLock};

use nix::unistd::{getuid, User};
use regex::{Captures, Regex};

use crate::error::{PathError, PathResult};

static VARIABLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$(?:\{([^}]*)\}|([A-Za-z0-9_]+))").expect("unable to compile variable regex")
});

static UNCLOSED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{[^}]*$").expect("unable to compile unclosed regex"));

/// The current user's home directory.
///
/// `HOME` wins; otherwise the password database is consulted, and `/root`
/// (the only user on Unraid) is the fallback.
pub fn home_dir() -> PathBuf {
    if let Some(home) = env::var_os("HOME") {
        return PathBuf::from(home);
    }
    match User::from_uid(getuid()) {
        Ok(Some(user)) => user.dir,
        _ => PathBuf::from("/root"),
    }
}

/// `$XDG_CONFIG_HOME`, defaulting to `~/.config`.
pub fn xdg_config_home() -> PathBuf {
    env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| home_dir().join(".config"))
}

fn variable(name: &str, input: &str) -> PathResult<String> {
    match name {
        "HOME" => Ok(home_dir().to_string_lossy().into_owned()),
        "XDG_CONFIG_HOME" => Ok(xdg_config_home().to_string_lossy().into_owned()),
        _ => env::var(name).map_err(|_| PathError::MissingEnvVar {
            var: name.into(),
            input: input.into(),
        }),
    }
}

/// Expands a leading `~` and every `$VAR`/`${VAR}` reference.
///
/// A `$` not followed by a name is kept as-is.
pub fn expand_variables(input: &str) -> PathResult<String> {
    if let Some(unclosed) = UNCLOSED_RE.find(input) {
        return Err(PathError::UnclosedVariable {
            input: unclosed.as_str().into(),
        });
    }

    let (mut expanded, rest) = match input.strip_prefix('~') {
        Some(rest) => (home_dir().to_string_lossy().into_owned(), rest),
        None => (String::new(), input),
    };

    let mut failure = None;
    let replaced = VARIABLE_RE.replace_all(rest, |caps: &Captures| {
        let name = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
        match variable(name, input) {
            Ok(value) => value,
            Err(err) => {
                failure.get_or_insert(err);
                String::new()
            }
        }
    });
    if let Some(err) = failure {
        return Err(err);
    }

    expanded.push_str(&replaced);
    Ok(expanded)
}

/// Expands variables in `path` and makes it absolute.
///
/// # Errors
///
/// * [`PathError::Empty`] for a blank path
/// * [`PathError::MissingEnvVar`] / [`PathError::UnclosedVariable`] from expansion
/// * [`PathError::CurrentDir`] when a relative path cannot be anchored
pub fn resolve_path(path: &str) -> PathResult<PathBuf> {
    let path = path.trim();
    if path.is_empty() {
        return Err(PathError::Empty);
    }

    let expanded = PathBuf::from(expand_variables(path)?);
    if expanded.is_absolute() {
        return Ok(expanded);
    }

    env::current_dir()
        .map(|cwd| cwd.join(&expanded))
        .map_err(|source| PathError::CurrentDir { source })
}

/// Display form of a path with the home directory shortened to `~`.
pub fn display_path(path: &std::path::Path) -> Cow<'_, str> {
    let home = home_dir();
    match path.strip_prefix(&home) {
        Ok(rest) if !home.as_os_str().is_empty() => {
            Cow::Owned(format!("~/{}", rest.to_string_lossy()))
        }
        _ => path.to_string_lossy(),
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    fn with_vars<F: FnOnce()>(vars: &[(&str, Option<&str>)], f: F) {
        let saved: Vec<_> = vars.iter().map(|(k, _)| (*k, env::var_os(k))).collect();
        for (key, value) in vars {
            match value {
                Some(value) => env::set_var(key, value),
                None => env::remove_var(key),
            }
        }
        f();
        for (key, value) in saved {
            match value {
                Some(value) => env::set_var(key, value),
                None => env::remove_var(key),
            }
        }
    }

    #[test]
    #[serial]
    fn test_expand_variables() {
        with_vars(&[("CA_TEST_VAR", Some("tempFiles"))], || {
            assert_eq!(expand_variables("/tmp/$CA_TEST_VAR/x").unwrap(), "/tmp/tempFiles/x");
            assert_eq!(expand_variables("${CA_TEST_VAR}-old").unwrap(), "tempFiles-old");
            assert_eq!(expand_variables("path/$").unwrap(), "path/$");
            assert_eq!(expand_variables("path/$!x").unwrap(), "path/$!x");
        });
    }

    #[test]
    #[serial]
    fn test_expand_variables_errors() {
        assert!(matches!(
            expand_variables("/tmp/${CA_TEST_VAR"),
            Err(PathError::UnclosedVariable { .. })
        ));
        with_vars(&[("CA_UNSET_VAR", None)], || {
            assert!(matches!(
                expand_variables("$CA_UNSET_VAR/x"),
                Err(PathError::MissingEnvVar { var, .. }) if var == "CA_UNSET_VAR"
            ));
        });
    }

    #[test]
    #[serial]
    fn test_tilde_only_at_start() {
        with_vars(&[("HOME", Some("/tmp/home"))], || {
            assert_eq!(expand_variables("~/ca").unwrap(), "/tmp/home/ca");
            assert_eq!(expand_variables("a/~/b").unwrap(), "a/~/b");
        });
    }

    #[test]
    #[serial]
    fn test_resolve_path() {
        with_vars(&[("HOME", Some("/tmp/home"))], || {
            assert!(matches!(resolve_path("  "), Err(PathError::Empty)));
            assert_eq!(
                resolve_path("/boot/config").unwrap(),
                PathBuf::from("/boot/config")
            );
            assert_eq!(
                resolve_path("relative/path").unwrap(),
                env::current_dir().unwrap().join("relative/path")
            );
            assert_eq!(
                resolve_path("$HOME/.config").unwrap(),
                PathBuf::from("/tmp/home/.config")
            );
        });
    }

    #[test]
    #[serial]
    fn test_xdg_config_home() {
        with_vars(
            &[("HOME", Some("/tmp/home")), ("XDG_CONFIG_HOME", None)],
            || assert_eq!(xdg_config_home(), PathBuf::from("/tmp/home/.config")),
        );
        with_vars(&[("XDG_CONFIG_HOME", Some("/tmp/config"))], || {
            assert_eq!(xdg_config_home(), PathBuf::from("/tmp/config"))
        });
    }

    #[test]
    #[serial]
    fn test_display_path() {
        with_vars(&[("HOME", Some("/tmp/home"))], || {
            assert_eq!(
                display_path(std::path::Path::new("/tmp/home/.config/ca")),
                "~/.config/ca"
            );
            assert_eq!(display_path(std::path::Path::new("/boot/x")), "/boot/x");
        });
    }
}
