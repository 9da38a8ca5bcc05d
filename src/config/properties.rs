//! Java-properties-backed property source
//!
//! Flat `key=value` (or `key: value`) files in the `application.properties`
//! style. Merging rewrites matching keys in place and appends new ones, so
//! comments and unrelated lines survive untouched. Writes always use the
//! `=` form.

use super::source::{write_atomic, PropertySource};
use crate::Result;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct PropertiesSource {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl PropertiesSource {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut values = BTreeMap::new();
        if path.exists() {
            for line in fs::read_to_string(&path)?.lines() {
                if let Some((key, value)) = parse_line(line) {
                    values.insert(key.to_string(), value.to_string());
                }
            }
        }
        Ok(Self { path, values })
    }
}

/// Split a properties line into key and value, skipping comments and blanks.
/// Java properties accept both `=` and `:` as the separator; the first one
/// on the line wins.
fn parse_line(line: &str) -> Option<(&str, &str)> {
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
        return None;
    }
    let separator = trimmed.find(['=', ':'])?;
    let (key, value) = (&trimmed[..separator], &trimmed[separator + 1..]);
    Some((key.trim(), value.trim()))
}

/// Rewrite the file contents with `entries` applied: matching keys updated in
/// place, everything else untouched, unseen keys appended at the end.
fn apply(existing: &str, entries: &BTreeMap<String, String>) -> String {
    let mut remaining: BTreeMap<&str, &str> = entries
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();

    let mut out = String::new();
    for line in existing.lines() {
        match parse_line(line) {
            Some((key, _)) if remaining.contains_key(key) => {
                let value = remaining.remove(key).unwrap();
                out.push_str(&format!("{}={}\n", key, value));
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
    out
}

impl PropertySource for PropertiesSource {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn merge(&mut self, entries: BTreeMap<String, String>) -> Result<()> {
        let existing = if self.path.exists() {
            fs::read_to_string(&self.path)?
        } else {
            String::new()
        };
        let updated = apply(&existing, &entries);
        write_atomic(&self.path, &updated)?;
        self.values.extend(entries);
        Ok(())
    }

    fn location(&self) -> &Path {
        &self.path
    }
}
