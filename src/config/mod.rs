//! Project configuration file handling
//!
//! A uniform read/write/merge view over the three supported on-disk formats
//! (YAML, Java properties, dotenv), plus the locator that picks the right
//! backend for a given project.

pub mod env_file;
pub mod locator;
pub mod properties;
pub mod source;
pub mod yaml;

pub use env_file::EnvFileSource;
pub use locator::find_application_config;
pub use properties::PropertiesSource;
pub use source::PropertySource;
pub use yaml::YamlSource;
