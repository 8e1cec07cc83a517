//! Error types for template handling.

use ca_store::StoreError;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum TemplateError {
    #[error("Failed to read template {path}: {source}")]
    #[diagnostic(
        code(ca_template::read),
        help("Check that the template file exists and is readable")
    )]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    #[error("Template is not a map: {0}")]
    #[diagnostic(
        code(ca_template::not_a_map),
        help("A template must be a JSON object or an XML document")
    )]
    NotAMap(String),
}

pub type Result<T> = std::result::Result<T, TemplateError>;
