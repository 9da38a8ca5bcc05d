//! SDK configuration handling
//!
//! Reads the currently-effective org URL / API token pair from the canonical
//! credential store (`~/.okta/okta.yaml`), and writes new credentials back to
//! it. The store is always YAML, regardless of which format the project's own
//! runtime configuration uses.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// The resolved base URL / token pair. Read-only input to the orchestrator;
/// loaded without validation so an empty or partial file is not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfiguration {
    pub base_url: Option<String>,
    pub token: Option<String>,
}

/// Loads and persists SDK credentials.
pub trait SdkConfigurationService: Send + Sync {
    /// Load the configuration from `file` without validating it. A missing
    /// or empty file yields an empty configuration, not an error.
    fn load_unvalidated_configuration(&self, file: &Path) -> Result<ClientConfiguration>;

    /// Persist verified credentials as `{ okta: { client: { orgUrl, token } } }`,
    /// creating parent directories as needed.
    fn write_okta_yaml(&self, org_url: &str, api_token: &str, file: &Path) -> Result<()>;
}

/// On-disk shape of okta.yaml
#[derive(Debug, Default, Serialize, Deserialize)]
struct OktaYaml {
    #[serde(default)]
    okta: OktaSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct OktaSection {
    #[serde(default)]
    client: ClientSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct ClientSection {
    #[serde(rename = "orgUrl", default)]
    org_url: Option<String>,
    #[serde(default)]
    token: Option<String>,
}

pub struct DefaultSdkConfigurationService;

impl SdkConfigurationService for DefaultSdkConfigurationService {
    fn load_unvalidated_configuration(&self, file: &Path) -> Result<ClientConfiguration> {
        if !file.exists() {
            return Ok(ClientConfiguration::default());
        }
        let content = fs::read_to_string(file)?;
        if content.trim().is_empty() {
            return Ok(ClientConfiguration::default());
        }
        let parsed: OktaYaml = serde_yaml::from_str(&content)?;
        Ok(ClientConfiguration {
            base_url: parsed.okta.client.org_url,
            token: parsed.okta.client.token,
        })
    }

    fn write_okta_yaml(&self, org_url: &str, api_token: &str, file: &Path) -> Result<()> {
        let document = OktaYaml {
            okta: OktaSection {
                client: ClientSection {
                    org_url: Some(org_url.to_string()),
                    token: Some(api_token.to_string()),
                },
            },
        };

        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&document)?;
        fs::write(file, yaml)?;
        Ok(())
    }
}

/// Default location of the credential store: `~/.okta/okta.yaml`.
pub fn default_okta_config_path() -> PathBuf {
    let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(".okta");
    path.push("okta.yaml");
    path
}
