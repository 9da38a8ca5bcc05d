//! The PropertySource abstraction
//!
//! One physical configuration file viewed as a string-to-string map. The
//! orchestrator never touches raw files; it only reads and merges through
//! this trait.

use crate::Result;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Uniform view over a single physical configuration file.
///
/// `merge` adds or overwrites entries without deleting untouched keys, and is
/// atomic from the caller's perspective: after a failed call the file is left
/// in its pre-call state.
pub trait PropertySource: Send + std::fmt::Debug {
    /// Read a single property, if present.
    fn get(&self, key: &str) -> Option<String>;

    /// Add or overwrite the given entries, leaving all other keys intact.
    fn merge(&mut self, entries: BTreeMap<String, String>) -> Result<()>;

    /// The physical file backing this source.
    fn location(&self) -> &Path;
}

/// Write `contents` to `path` by staging in a sibling temp file and renaming
/// it into place, so a failure mid-write never clobbers the original.
///
/// Parent directories are created if absent (the YAML default source is
/// allowed to not pre-exist).
pub(crate) fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => std::path::PathBuf::from("."),
    };
    fs::create_dir_all(&parent)?;

    let mut tmp = tempfile::NamedTempFile::new_in(&parent)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
