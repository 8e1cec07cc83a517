use ca_store::StoreError;
use ca_utils::error::{FileSystemError, PathError};
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("TOML serialization error: {0}")]
    #[diagnostic(
        code(ca_config::toml_serialize),
        help("Check your configuration structure for invalid values")
    )]
    TomlSerError(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    #[diagnostic(
        code(ca_config::toml_deserialize),
        help("Check your config.toml syntax and structure")
    )]
    TomlDeError(#[from] toml::de::Error),

    #[error("Configuration file already exists")]
    #[diagnostic(
        code(ca_config::already_exists),
        help("Remove the existing config file or use a different location")
    )]
    ConfigAlreadyExists,

    #[error("Invalid sort direction: {0}")]
    #[diagnostic(
        code(ca_config::invalid_sort_direction),
        help("Use `Up` or `Down`")
    )]
    InvalidSortDirection(String),

    #[error("IO error: {0}")]
    #[diagnostic(code(ca_config::io))]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    #[diagnostic(
        code(ca_config::path),
        help("Check the paths in your config file and the CA_TEMP / CA_FLASH variables")
    )]
    Path(#[from] PathError),

    #[error(transparent)]
    #[diagnostic(code(ca_config::filesystem))]
    FileSystem(#[from] FileSystemError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to parse TOML: {0}")]
    #[diagnostic(code(ca_config::toml))]
    Toml(#[from] toml_edit::TomlError),

    #[error("Encountered unexpected TOML item: {0}")]
    #[diagnostic(code(ca_config::unexpected_toml_item))]
    UnexpectedTomlItem(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
