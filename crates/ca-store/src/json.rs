//! State files.
//!
//! State files are always written as pretty JSON through an atomic rename.
//! The reader also understands files left behind in PHP serialized form.

use std::{fs, path::Path};

use ca_utils::fs::write_atomic;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::{
    error::{ErrorContext, Result, StoreError},
    php,
};

/// Loads a state file, decoding JSON or PHP serialized content.
///
/// # Errors
///
/// * [`StoreError::IoError`] if the file cannot be read
/// * [`StoreError::UnknownFormat`] if the content is neither JSON nor serialized data
/// * [`StoreError::JsonError`] / [`StoreError::Unserialize`] if decoding fails
pub fn load_state_file<P: AsRef<Path>>(path: P) -> Result<Value> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading state file {}", path.display()))?;
    debug!("loaded state file {} ({} bytes)", path.display(), content.len());

    let content = content.trim();
    if let Ok(value) = php::unserialize(content) {
        trace!("{} holds serialized data", path.display());
        return Ok(value);
    }
    if content.starts_with(['{', '[']) {
        return Ok(serde_json::from_str(content)?);
    }
    Err(StoreError::UnknownFormat)
}

/// Reads a state file, returning an empty array when it is missing, unreadable
/// or does not decode to an array or map.
pub fn read_json_file<P: AsRef<Path>>(path: P) -> Value {
    let path = path.as_ref();
    if !path.exists() {
        trace!("state file {} does not exist", path.display());
        return Value::Array(Vec::new());
    }

    match load_state_file(path) {
        Ok(value @ (Value::Array(_) | Value::Object(_))) => value,
        Ok(_) => {
            warn!("state file {} does not hold a list or map", path.display());
            Value::Array(Vec::new())
        }
        Err(err) => {
            warn!("failed to read state file {}: {}", path.display(), err);
            Value::Array(Vec::new())
        }
    }
}

/// Reads a state file into a typed value, falling back to `T::default()`.
pub fn read_json_file_as<T, P>(path: P) -> T
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    match load_state_file(path) {
        Ok(value) => {
            serde_json::from_value(value).unwrap_or_else(|err| {
                warn!("unexpected layout in {}: {}", path.display(), err);
                T::default()
            })
        }
        Err(err) => {
            trace!("falling back to default for {}: {}", path.display(), err);
            T::default()
        }
    }
}

/// Writes `value` to `path` as pretty JSON.
///
/// The file is staged next to the target and renamed into place, so readers
/// never observe a partial write. Returns the number of bytes written.
pub fn write_json_file<T, P>(path: P, value: &T) -> Result<usize>
where
    T: Serialize + ?Sized,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let bytes = serde_json::to_vec_pretty(value)?;
    let written = write_atomic(path, &bytes)?;
    debug!("wrote state file {} ({} bytes)", path.display(), written);
    Ok(written)
}
