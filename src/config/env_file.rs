//! Dotenv-backed property source
//!
//! `.env` files hold the same logical properties under shell-style names:
//! dots and dashes become underscores and the whole key is uppercased, so
//! `okta.oauth2.client-id` is stored as `OKTA_OAUTH2_CLIENT_ID`.

use super::source::{write_atomic, PropertySource};
use crate::Result;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct EnvFileSource {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

/// Transform a logical property name into its dotenv form.
pub fn env_key(key: &str) -> String {
    key.replace(['.', '-'], "_").to_uppercase()
}

impl EnvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut values = BTreeMap::new();
        if path.exists() {
            for line in fs::read_to_string(&path)?.lines() {
                let trimmed = line.trim_start();
                if trimmed.is_empty() || trimmed.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = trimmed.split_once('=') {
                    values.insert(key.trim().to_string(), value.trim().to_string());
                }
            }
        }
        Ok(Self { path, values })
    }
}

impl PropertySource for EnvFileSource {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(&env_key(key)).cloned()
    }

    fn merge(&mut self, entries: BTreeMap<String, String>) -> Result<()> {
        let transformed: BTreeMap<String, String> = entries
            .into_iter()
            .map(|(k, v)| (env_key(&k), v))
            .collect();

        let existing = if self.path.exists() {
            fs::read_to_string(&self.path)?
        } else {
            String::new()
        };

        let mut remaining = transformed.clone();
        let mut out = String::new();
        for line in existing.lines() {
            let key = line
                .trim_start()
                .split_once('=')
                .map(|(k, _)| k.trim())
                .filter(|_| !line.trim_start().starts_with('#'));
            match key {
                Some(k) if remaining.contains_key(k) => {
                    let value = remaining.remove(k).unwrap();
                    out.push_str(&format!("{}={}\n", k, value));
                }
                _ => {
                    out.push_str(line);
                    out.push('\n');
                }
            }
        }
        for (key, value) in remaining {
            out.push_str(&format!("{}={}\n", key, value));
        }

        write_atomic(&self.path, &out)?;
        self.values.extend(transformed);
        Ok(())
    }

    fn location(&self) -> &Path {
        &self.path
    }
}
