use std::{error::Error, fmt, path::PathBuf};

/// Failure to turn a configured location into a usable path.
#[derive(Debug)]
pub enum PathError {
    Empty,

    CurrentDir { source: std::io::Error },

    MissingEnvVar { var: String, input: String },

    UnclosedVariable { input: String },
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::Empty => write!(f, "Path is empty"),
            PathError::CurrentDir { source } => {
                write!(f, "Cannot resolve relative path, no working directory: {source}")
            }
            PathError::MissingEnvVar { var, input } => {
                write!(f, "`${var}` in `{input}` is not set")
            }
            PathError::UnclosedVariable { input } => {
                write!(f, "Missing `}}` after `{input}`")
            }
        }
    }
}

impl Error for PathError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PathError::CurrentDir { source } => Some(source),
            _ => None,
        }
    }
}

/// The filesystem step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsOp {
    Remove,
    CreateDir,
    Write,
    CreateTemp,
}

impl fmt::Display for FsOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            FsOp::Remove => "remove",
            FsOp::CreateDir => "create directory",
            FsOp::Write => "write",
            FsOp::CreateTemp => "create scratch file in",
        };
        f.write_str(verb)
    }
}

#[derive(Debug)]
pub enum FileSystemError {
    Io {
        op: FsOp,
        path: PathBuf,
        source: std::io::Error,
    },

    NotADirectory { path: PathBuf },

    Rename {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
}

impl FileSystemError {
    pub fn io<P: Into<PathBuf>>(op: FsOp, path: P, source: std::io::Error) -> Self {
        FileSystemError::Io {
            op,
            path: path.into(),
            source,
        }
    }
}

impl fmt::Display for FileSystemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileSystemError::Io { op, path, source } => {
                write!(f, "Cannot {op} `{}`: {source}", path.display())
            }
            FileSystemError::NotADirectory { path } => {
                write!(f, "`{}` exists but is not a directory", path.display())
            }
            FileSystemError::Rename { from, to, source } => {
                write!(
                    f,
                    "Cannot move `{}` into place at `{}`: {source}",
                    from.display(),
                    to.display()
                )
            }
        }
    }
}

impl Error for FileSystemError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FileSystemError::Io { source, .. } | FileSystemError::Rename { source, .. } => {
                Some(source)
            }
            FileSystemError::NotADirectory { .. } => None,
        }
    }
}

pub type FileSystemResult<T> = std::result::Result<T, FileSystemError>;
pub type PathResult<T> = std::result::Result<T, PathError>;
