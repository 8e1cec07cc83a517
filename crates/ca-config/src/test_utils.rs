use std::{env, ffi::OsString};

/// Restores the captured variables when dropped, even if the test panics.
struct EnvGuard(Vec<(String, Option<OsString>)>);

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in self.0.drain(..) {
            match value {
                Some(value) => env::set_var(&key, value),
                None => env::remove_var(&key),
            }
        }
    }
}

/// Runs `f` with `vars` set. Tests calling this must be `#[serial]`.
pub fn with_env<F: FnOnce()>(vars: Vec<(&str, &str)>, f: F) {
    let _guard = EnvGuard(
        vars.iter()
            .map(|(key, _)| (key.to_string(), env::var_os(key)))
            .collect(),
    );
    for (key, value) in &vars {
        env::set_var(key, value);
    }
    f();
}
