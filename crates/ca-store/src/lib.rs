//! File codecs for Community Applications state.
//!
//! This crate reads and writes the small files the catalog keeps between
//! requests:
//! - **State files**: JSON written atomically, with a reader that also accepts
//!   legacy PHP serialized data ([`json`], [`php`])
//! - **Settings**: `key="value"` INI files ([`ini`])
//! - **Templates**: XML documents mapped onto JSON objects ([`xml`])
//!
//! [`convert`] detects which of these encodings an arbitrary payload uses.
//!
//! # Example
//!
//! ```no_run
//! use ca_store::{read_json_file, write_json_file};
//! use serde_json::json;
//!
//! fn save() -> ca_store::Result<()> {
//!     write_json_file("/tmp/community.applications/pluginDupes.json", &json!({"a.plg": 2}))?;
//!     let dupes = read_json_file("/tmp/community.applications/pluginDupes.json");
//!     assert!(dupes.is_object());
//!     Ok(())
//! }
//! ```

pub mod convert;
pub mod error;
pub mod ini;
pub mod json;
pub mod php;
pub mod xml;

pub use convert::{to_value, Format, Kind};
pub use error::{ErrorContext, Result, StoreError};
pub use ini::{format_ini, parse_ini, read_ini_file, write_ini_file};
pub use json::{load_state_file, read_json_file, read_json_file_as, write_json_file};
pub use xml::{value_to_xml, xml_to_value, ATTRIBUTES_KEY, VALUE_KEY};
