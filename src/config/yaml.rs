//! YAML-backed property source
//!
//! Spring-style `application.yml` files: a dotted property name like
//! `okta.oauth2.client-id` addresses a nested path in the YAML mapping tree.

use super::source::{write_atomic, PropertySource};
use crate::Result;
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Property source over a nested YAML document.
///
/// The backing file does not need to exist yet; the first `merge` creates it.
#[derive(Debug)]
pub struct YamlSource {
    path: PathBuf,
    root: Mapping,
}

impl YamlSource {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let root = if path.exists() {
            let content = fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                Mapping::new()
            } else {
                serde_yaml::from_str(&content)?
            }
        } else {
            Mapping::new()
        };
        Ok(Self { path, root })
    }

    fn lookup(&self, key: &str) -> Option<&Value> {
        let mut mapping = Some(&self.root);
        let mut node = None;
        for part in key.split('.') {
            let value = mapping?.get(Value::String(part.to_string()))?;
            node = Some(value);
            mapping = value.as_mapping();
        }
        node
    }

    fn insert_nested(root: &mut Mapping, key: &str, value: String) {
        let mut parts = key.split('.').peekable();
        let mut current = root;
        while let Some(part) = parts.next() {
            let part_key = Value::String(part.to_string());
            if parts.peek().is_none() {
                current.insert(part_key, Value::String(value));
                return;
            }
            // Descend, replacing any non-mapping intermediate with a mapping
            let entry = current
                .entry(part_key)
                .or_insert_with(|| Value::Mapping(Mapping::new()));
            if !entry.is_mapping() {
                *entry = Value::Mapping(Mapping::new());
            }
            current = entry.as_mapping_mut().unwrap();
        }
    }
}

impl PropertySource for YamlSource {
    fn get(&self, key: &str) -> Option<String> {
        match self.lookup(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    fn merge(&mut self, entries: BTreeMap<String, String>) -> Result<()> {
        let mut updated = self.root.clone();
        for (key, value) in entries {
            Self::insert_nested(&mut updated, &key, value);
        }
        let serialized = serde_yaml::to_string(&updated)?;
        write_atomic(&self.path, &serialized)?;
        self.root = updated;
        Ok(())
    }

    fn location(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entries(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_get_nested_key() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("application.yml");
        fs::write(&path, "okta:\n  oauth2:\n    client-id: abc123\n").unwrap();

        let source = YamlSource::new(&path).unwrap();
        assert_eq!(
            source.get("okta.oauth2.client-id"),
            Some("abc123".to_string())
        );
        assert_eq!(source.get("okta.oauth2.client-secret"), None);
    }

    #[test]
    fn test_merge_creates_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("application.yml");

        let mut source = YamlSource::new(&path).unwrap();
        source
            .merge(entries(&[("okta.oauth2.issuer", "https://example.okta.com")]))
            .unwrap();

        assert!(path.exists());
        let reloaded = YamlSource::new(&path).unwrap();
        assert_eq!(
            reloaded.get("okta.oauth2.issuer"),
            Some("https://example.okta.com".to_string())
        );
    }

    #[test]
    fn test_merge_preserves_untouched_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("application.yml");
        fs::write(&path, "server:\n  port: 8080\n").unwrap();

        let mut source = YamlSource::new(&path).unwrap();
        source
            .merge(entries(&[("okta.oauth2.client-id", "abc")]))
            .unwrap();

        let reloaded = YamlSource::new(&path).unwrap();
        assert_eq!(reloaded.get("server.port"), Some("8080".to_string()));
        assert_eq!(reloaded.get("okta.oauth2.client-id"), Some("abc".to_string()));
    }

    #[test]
    fn test_merge_twice_is_idempotent_and_additive() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("application.yml");

        let mut source = YamlSource::new(&path).unwrap();
        source
            .merge(entries(&[("a.b", "1"), ("a.c", "2")]))
            .unwrap();
        source
            .merge(entries(&[("a.b", "1"), ("a.d", "3")]))
            .unwrap();

        let reloaded = YamlSource::new(&path).unwrap();
        assert_eq!(reloaded.get("a.b"), Some("1".to_string()));
        assert_eq!(reloaded.get("a.c"), Some("2".to_string()));
        assert_eq!(reloaded.get("a.d"), Some("3".to_string()));
    }
}
