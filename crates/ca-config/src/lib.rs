pub mod annotations;
pub mod config;
pub mod error;
pub mod paths;
pub mod settings;
pub mod utils;

#[cfg(test)]
pub mod test_utils;

pub use config::{config_path, generate_default_config, Config};
pub use error::{ConfigError, Result};
pub use paths::Paths;
pub use settings::{Settings, SortDirection, SortOrder};
