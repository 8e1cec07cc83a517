//! Filesystem helpers for state files.
//!
//! Every state file is replaced atomically: the new contents go to a sibling
//! `<file>~` first and are then renamed over the target, so a reader sees
//! either the old file or the new one.

use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

use crate::error::{FileSystemError, FileSystemResult, FsOp};

/// Prefix of the scratch files created by [`random_file`].
pub const TEMP_FILE_PREFIX: &str = "CA-Temp-";

/// Returns the sibling path used while a file is being written: `<path>~`.
pub fn staging_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_os_string();
    name.push("~");
    PathBuf::from(name)
}

/// Creates `path` and its parents. An existing directory is left alone.
///
/// # Errors
///
/// [`FileSystemError::NotADirectory`] when something other than a directory
/// is already at `path`.
pub fn ensure_dir_exists<P: AsRef<Path>>(path: P) -> FileSystemResult<()> {
    let path = path.as_ref();
    if path.is_dir() {
        return Ok(());
    }
    if path.exists() {
        return Err(FileSystemError::NotADirectory {
            path: path.to_path_buf(),
        });
    }
    fs::create_dir_all(path).map_err(|err| FileSystemError::io(FsOp::CreateDir, path, err))
}

/// Removes a file, or a directory with its contents. A missing path is fine.
pub fn safe_remove<P: AsRef<Path>>(path: P) -> FileSystemResult<()> {
    let path = path.as_ref();
    let result = match fs::symlink_metadata(path) {
        Err(_) => return Ok(()),
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
    };
    result.map_err(|err| FileSystemError::io(FsOp::Remove, path, err))
}

/// Atomically replaces the contents of `path` and returns the bytes written.
///
/// The parent directory must already exist. When the rename fails the staging
/// file is cleaned up.
pub fn write_atomic<P: AsRef<Path>>(path: P, contents: &[u8]) -> FileSystemResult<usize> {
    let path = path.as_ref();
    let staging = staging_path(path);

    fs::write(&staging, contents).map_err(|err| FileSystemError::io(FsOp::Write, &staging, err))?;

    if let Err(err) = fs::rename(&staging, path) {
        let _ = fs::remove_file(&staging);
        return Err(FileSystemError::Rename {
            from: staging,
            to: path.to_path_buf(),
            source: err,
        });
    }

    Ok(contents.len())
}

/// Creates an empty, uniquely named file in `dir` and returns its path.
///
/// The file is kept after the call; removing it is up to the caller.
pub fn random_file<P: AsRef<Path>>(dir: P) -> FileSystemResult<PathBuf> {
    let dir = dir.as_ref();
    tempfile::Builder::new()
        .prefix(TEMP_FILE_PREFIX)
        .tempfile_in(dir)
        .map_err(|err| FileSystemError::io(FsOp::CreateTemp, dir, err))?
        .into_temp_path()
        .keep()
        .map_err(|err| FileSystemError::io(FsOp::CreateTemp, dir, err.error))
}
