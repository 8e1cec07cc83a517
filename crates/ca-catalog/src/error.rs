//! Error types for catalog operations.

use ca_config::ConfigError;
use ca_store::StoreError;
use ca_template::TemplateError;
use ca_utils::error::FileSystemError;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum CatalogError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    #[diagnostic(
        code(ca_catalog::filesystem),
        help("Check that the temporary directory exists and is writable")
    )]
    FileSystem(#[from] FileSystemError),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
