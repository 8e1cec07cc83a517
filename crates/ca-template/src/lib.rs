//! Application templates for the Community Applications catalog.
//!
//! A [`Template`] describes one installable container or plugin. This crate
//! reads templates from XML, writes them back, normalizes the loosely typed
//! fields template authors produce, and derives the values shown next to an
//! application (author, download bucket, category list, published ports).

pub mod debug;
pub mod display;
pub mod error;
pub mod fix;
pub mod template;
pub mod xml;

pub use debug::dump_value;
pub use display::{
    category_list, fix_description, get_author, get_downloads, language_author_list,
    language_check, ports_used,
};
pub use error::{Result, TemplateError};
pub use fix::{fix_templates, version_check};
pub use template::Template;
pub use xml::{
    add_missing_vars, fix_attributes, load_xml_file, make_xml, read_xml_file, remove_xml_tags,
};
