//! Error types for the store crate.
//!
//! This module defines [`StoreError`], the error type used throughout
//! the crate, along with helper traits for error context.

use ca_utils::error::FileSystemError;
use miette::Diagnostic;
use thiserror::Error;

/// Errors that can occur while reading or writing state files.
#[derive(Error, Diagnostic, Debug)]
pub enum StoreError {
    #[error("Error while {action}: {source}")]
    #[diagnostic(code(ca_store::io))]
    IoError {
        action: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(
        code(ca_store::filesystem),
        help("Check that the parent directory exists and is writable")
    )]
    FileSystem(#[from] FileSystemError),

    #[error(transparent)]
    #[diagnostic(
        code(ca_store::json),
        help("The state file may be corrupted or in an invalid format")
    )]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid serialized data at byte {offset}: {reason}")]
    #[diagnostic(
        code(ca_store::unserialize),
        help("The state file may be truncated or written by an incompatible tool")
    )]
    Unserialize { offset: usize, reason: String },

    #[error("Malformed XML: {0}")]
    #[diagnostic(
        code(ca_store::xml),
        help("Check the template for unclosed or mismatched tags")
    )]
    MalformedXml(String),

    #[error("Unrecognised data format")]
    #[diagnostic(
        code(ca_store::unknown_format),
        help("Expected JSON, PHP serialized data, or XML")
    )]
    UnknownFormat,
}

/// A specialized Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Extension trait for adding context to I/O errors.
pub trait ErrorContext<T> {
    /// Adds context to an error, describing what action was being performed.
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: FnOnce() -> String;
}

impl<T> ErrorContext<T> for std::io::Result<T> {
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: FnOnce() -> String,
    {
        self.map_err(|err| {
            StoreError::IoError {
                action: context(),
                source: err,
            }
        })
    }
}
