//! Persistent memoization stores for oracle responses.
//!
//! Remote oracle calls are expensive and rate-limited, so every response
//! is memoized on disk keyed by the exact input string. Two flavors
//! exist:
//!
//! - [`SingleValueStore`]: one `f64` per key, written at most once — an
//!   existing value is never overwritten.
//! - [`MultiValueStore`]: an ordered list of strings per key, values
//!   appended under the key.
//!
//! Both are explicit resources owned by their oracle client and flushed
//! on [`flush`](SingleValueStore::flush) and on drop. Snapshots are JSON
//! maps replaced atomically: the new snapshot is written to a temporary
//! file in the target directory and renamed over the old one.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::warn;
use tempfile::NamedTempFile;

use crate::{Error, Result};

fn read_snapshot<T: serde::de::DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Ok(T::default());
    }

    let file = File::open(path)?;
    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| Error::store(format!("corrupt snapshot {}: {e}", path.display())))
}

fn write_snapshot<T: serde::Serialize>(path: &Path, values: &T) -> Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent)?;

    let temp = NamedTempFile::new_in(parent)?;
    let mut writer = BufWriter::new(&temp);
    serde_json::to_writer(&mut writer, values)
        .map_err(|e| Error::store(format!("serializing snapshot {}: {e}", path.display())))?;
    writer.flush()?;
    drop(writer);

    temp.persist(path)
        .map_err(|e| Error::store(format!("replacing snapshot {}: {e}", path.display())))?;
    Ok(())
}

/// Persistent 1:1 key-value store; a present key is never overwritten.
#[derive(Debug)]
pub struct SingleValueStore {
    path: PathBuf,
    values: HashMap<String, f64>,
    dirty: bool,
}

impl SingleValueStore {
    /// Open the store at `path`, loading the snapshot if one exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = read_snapshot(&path)?;
        Ok(Self {
            path,
            values,
            dirty: false,
        })
    }

    /// Whether a value has been recorded for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// The recorded value for `key`, if any.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    /// Record `value` under `key` unless the key is already present.
    pub fn put_if_absent(&mut self, key: &str, value: f64) {
        if !self.values.contains_key(key) {
            self.values.insert(key.to_string(), value);
            self.dirty = true;
        }
    }

    /// Number of recorded keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Write the snapshot to disk if anything changed since the last
    /// flush.
    pub fn flush(&mut self) -> Result<()> {
        if self.dirty {
            write_snapshot(&self.path, &self.values)?;
            self.dirty = false;
        }
        Ok(())
    }
}

impl Drop for SingleValueStore {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            warn!("failed to flush store {}: {e}", self.path.display());
        }
    }
}

/// Persistent 1:n key-value store; values accumulate under their key.
#[derive(Debug)]
pub struct MultiValueStore {
    path: PathBuf,
    values: HashMap<String, Vec<String>>,
    dirty: bool,
}

impl MultiValueStore {
    /// Open the store at `path`, loading the snapshot if one exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = read_snapshot(&path)?;
        Ok(Self {
            path,
            values,
            dirty: false,
        })
    }

    /// Whether `key` has at least one non-empty recorded value.
    pub fn contains(&self, key: &str) -> bool {
        self.values
            .get(key)
            .is_some_and(|entries| entries.iter().any(|e| !e.is_empty()))
    }

    /// All recorded values for `key`, oldest first; empty for unknown
    /// keys.
    pub fn get(&self, key: &str) -> Vec<String> {
        self.values.get(key).cloned().unwrap_or_default()
    }

    /// Append one value under `key`. Empty keys are ignored.
    pub fn append(&mut self, key: &str, value: impl Into<String>) {
        if key.is_empty() {
            return;
        }
        self.values
            .entry(key.to_string())
            .or_default()
            .push(value.into());
        self.dirty = true;
    }

    /// Append every value under `key`, preserving order.
    pub fn extend<I, S>(&mut self, key: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for value in values {
            self.append(key, value);
        }
    }

    /// Number of recorded keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Write the snapshot to disk if anything changed since the last
    /// flush.
    pub fn flush(&mut self) -> Result<()> {
        if self.dirty {
            write_snapshot(&self.path, &self.values)?;
            self.dirty = false;
        }
        Ok(())
    }
}

impl Drop for MultiValueStore {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            warn!("failed to flush store {}: {e}", self.path.display());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_value_store_is_write_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = SingleValueStore::open(dir.path().join("probs.json")).unwrap();

        store.put_if_absent("some query", -12.5);
        store.put_if_absent("some query", -99.0);

        assert_eq!(store.get("some query"), Some(-12.5));
    }

    #[test]
    fn single_value_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("probs.json");

        {
            let mut store = SingleValueStore::open(&path).unwrap();
            store.put_if_absent("a b c", -3.25);
            store.flush().unwrap();
        }

        let store = SingleValueStore::open(&path).unwrap();
        assert_eq!(store.get("a b c"), Some(-3.25));
    }

    #[test]
    fn multi_value_store_accumulates() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = MultiValueStore::open(dir.path().join("breaks.json")).unwrap();

        store.append("helloworld", "hello world");
        store.extend("helloworld", ["hell oworld".to_string()]);

        assert_eq!(store.get("helloworld"), vec!["hello world", "hell oworld"]);
        assert!(store.contains("helloworld"));
    }

    #[test]
    fn empty_values_do_not_count_as_present() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = MultiValueStore::open(dir.path().join("breaks.json")).unwrap();

        store.append("key", "");
        assert!(!store.contains("key"));

        store.append("", "value");
        assert!(!store.contains(""));
    }

    #[test]
    fn flush_on_drop_persists_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("breaks.json");

        {
            let mut store = MultiValueStore::open(&path).unwrap();
            store.append("k", "v");
        }

        let store = MultiValueStore::open(&path).unwrap();
        assert_eq!(store.get("k"), vec!["v"]);
    }
}
