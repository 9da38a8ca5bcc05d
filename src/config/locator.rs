//! Configuration file discovery
//!
//! Selects which PropertySource backend applies for a project, either from
//! an explicitly named file or from the conventional default locations.

use super::{EnvFileSource, PropertiesSource, PropertySource, YamlSource};
use crate::{Result, SetupError};
use std::path::Path;

const DEFAULT_PROPERTIES_PATH: &str = "src/main/resources/application.properties";
const DEFAULT_YAML_PATH: &str = "src/main/resources/application.yml";

/// Locate the application configuration for `project_root`.
///
/// With no explicit file, an existing `application.properties` wins over the
/// YAML default; the YAML default is used otherwise and does not need to
/// pre-exist. An explicit file is dispatched strictly on its extension:
/// `.yml`, `.properties`, or `.env`. Anything else is a configuration error,
/// reported without touching the file.
pub fn find_application_config(
    project_root: &Path,
    explicit_file: Option<&Path>,
) -> Result<Box<dyn PropertySource>> {
    match explicit_file {
        None => {
            let props_file = project_root.join(DEFAULT_PROPERTIES_PATH);
            if props_file.exists() {
                return Ok(Box::new(PropertiesSource::new(props_file)?));
            }
            Ok(Box::new(YamlSource::new(project_root.join(DEFAULT_YAML_PATH))?))
        }
        Some(file) => match file.extension().and_then(|e| e.to_str()) {
            Some("yml") => Ok(Box::new(YamlSource::new(file)?)),
            Some("properties") => Ok(Box::new(PropertiesSource::new(file)?)),
            Some("env") => Ok(Box::new(EnvFileSource::new(file)?)),
            _ => Err(SetupError::Config(format!(
                "Unsupported config file type: {}",
                file.display()
            ))),
        },
    }
}
