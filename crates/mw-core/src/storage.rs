//! Object storage seams for capture logs.
//!
//! Keys are `/`-separated paths. Listing is recursive and fully
//! materialized before any window filtering happens downstream.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;

use thiserror::Error;
use walkdir::WalkDir;

/// Errors from object store operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("listing {prefix} failed: {source}")]
    List {
        prefix: String,
        #[source]
        source: walkdir::Error,
    },

    #[error("opening {path} failed: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no such object: {0}")]
    NotFound(String),
}

/// Read-only object store holding capture logs.
pub trait ObjectStore {
    /// List every object key under `prefix`, sorted.
    fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError>;

    /// Open one object as a buffered line stream.
    fn open(&self, path: &str) -> Result<Box<dyn BufRead + '_>, StorageError>;
}

/// Filesystem-backed store. Keys are plain filesystem paths.
#[derive(Debug, Default)]
pub struct FsStore;

impl FsStore {
    pub fn new() -> Self {
        Self
    }
}

impl ObjectStore for FsStore {
    fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let mut keys = Vec::new();
        for entry in WalkDir::new(prefix).follow_links(false) {
            let entry = entry.map_err(|source| StorageError::List {
                prefix: prefix.to_string(),
                source,
            })?;
            if entry.file_type().is_file() {
                keys.push(entry.path().to_string_lossy().into_owned());
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn open(&self, path: &str) -> Result<Box<dyn BufRead + '_>, StorageError> {
        let file = File::open(Path::new(path)).map_err(|source| StorageError::Open {
            path: path.to_string(),
            source,
        })?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// In-memory store for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: BTreeMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an object, replacing any previous content.
    pub fn put(&mut self, path: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.objects.insert(path.into(), content.into());
    }
}

impl ObjectStore for MemoryStore {
    fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        Ok(self
            .objects
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn open(&self, path: &str) -> Result<Box<dyn BufRead + '_>, StorageError> {
        let content = self
            .objects
            .get(path)
            .ok_or_else(|| StorageError::NotFound(path.to_string()))?;
        Ok(Box::new(Cursor::new(content.as_slice())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fs_store_lists_files_recursively() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("2023/02/23/16");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("45-30-y"), "line\n").unwrap();
        std::fs::write(nested.join("44-00-x"), "line\n").unwrap();

        let store = FsStore::new();
        let keys = store.list(&dir.path().to_string_lossy()).unwrap();
        assert_eq!(keys.len(), 2);
        assert!(keys[0].ends_with("44-00-x"));
        assert!(keys[1].ends_with("45-30-y"));
    }

    #[test]
    fn fs_store_list_missing_prefix_fails() {
        let store = FsStore::new();
        let result = store.list("/nonexistent/capture/prefix");
        assert!(matches!(result, Err(StorageError::List { .. })));
    }

    #[test]
    fn fs_store_open_reads_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("capture.jsonl");
        std::fs::write(&path, "one\ntwo\n").unwrap();

        let store = FsStore::new();
        let reader = store.open(&path.to_string_lossy()).unwrap();
        let lines: Vec<String> = reader.lines().map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["one", "two"]);
    }

    #[test]
    fn fs_store_open_missing_fails() {
        let store = FsStore::new();
        let result = store.open("/nonexistent/capture.jsonl");
        assert!(matches!(result, Err(StorageError::Open { .. })));
    }

    #[test]
    fn memory_store_lists_by_prefix_sorted() {
        let mut store = MemoryStore::new();
        store.put("capture/a/2", "x");
        store.put("capture/a/1", "x");
        store.put("capture/b/1", "x");

        let keys = store.list("capture/a").unwrap();
        assert_eq!(keys, vec!["capture/a/1", "capture/a/2"]);
    }

    #[test]
    fn memory_store_open_missing_fails() {
        let store = MemoryStore::new();
        let result = store.open("capture/missing");
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn memory_store_open_reads_content() {
        let mut store = MemoryStore::new();
        store.put("capture/a", "alpha\nbeta");
        let reader = store.open("capture/a").unwrap();
        let lines: Vec<String> = reader.lines().map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["alpha", "beta"]);
    }
}
