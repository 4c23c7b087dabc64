// Persistent key/value storage
//
// The score store only needs a string-keyed string store that can say up
// front whether it is usable. `FileStore` keeps every key in one JSON file;
// `MemoryStore` keeps them in process and can be told to fail.

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised by a storage backend
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend cannot be used at all
    #[error("Storage is not available")]
    Unavailable,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend-specific failure
    #[error("Storage error: {0}")]
    Backend(String),
}

/// String-keyed persistent storage
pub trait KeyValueStore {
    /// Whether reads and writes can be attempted
    fn is_available(&self) -> bool;

    /// Read a value
    ///
    /// # Returns
    /// `Ok(None)` when the key has never been written
    fn read_value(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one
    fn write_value(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-process storage
///
/// Counts reads and writes and can simulate an unavailable or failing
/// backend.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    available: bool,
    fail_reads: bool,
    fail_writes: bool,
    reads: Cell<usize>,
    writes: usize,
}

impl MemoryStore {
    /// Create an empty, available store
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
            available: true,
            fail_reads: false,
            fail_writes: false,
            reads: Cell::new(0),
            writes: 0,
        }
    }

    /// Create an empty store that reports itself unavailable
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    /// Seed a value without counting it as a write
    pub fn insert(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    /// Current value for a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Make subsequent reads fail
    pub fn set_fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    /// Make subsequent writes fail
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Number of `read_value` calls so far
    pub fn read_count(&self) -> usize {
        self.reads.get()
    }

    /// Number of `write_value` calls so far, failed ones included
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    fn is_available(&self) -> bool {
        self.available
    }

    fn read_value(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.reads.set(self.reads.get() + 1);
        if !self.available {
            return Err(StorageError::Unavailable);
        }
        if self.fail_reads {
            return Err(StorageError::Backend(format!("read of '{}' failed", key)));
        }
        Ok(self.values.get(key).cloned())
    }

    fn write_value(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.writes += 1;
        if !self.available {
            return Err(StorageError::Unavailable);
        }
        if self.fail_writes {
            return Err(StorageError::Backend(format!("write of '{}' failed", key)));
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One stored value with its last write time
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredValue {
    value: String,
    /// RFC 3339 timestamp of the last write
    updated: String,
}

/// On-disk layout of a `FileStore`
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    entries: BTreeMap<String, StoredValue>,
}

/// JSON file backed storage
///
/// The whole file is rewritten on every write.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a store backed by `path`
    ///
    /// The file and its directory are created on first write.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Timestamp of the last write to a key
    pub fn last_updated(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .read_file()?
            .entries
            .get(key)
            .map(|entry| entry.updated.clone()))
    }

    fn directory(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn read_file(&self) -> Result<StoreFile, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(StoreFile::default()),
            Err(e) => Err(e.into()),
        }
    }
}

impl KeyValueStore for FileStore {
    fn is_available(&self) -> bool {
        if let Ok(meta) = fs::metadata(&self.path) {
            return meta.is_file() && !meta.permissions().readonly();
        }

        // Nothing written yet: the nearest existing ancestor must be writable
        self.directory()
            .ancestors()
            .find_map(|dir| fs::metadata(dir).ok())
            .is_some_and(|meta| meta.is_dir() && !meta.permissions().readonly())
    }

    fn read_value(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self
            .read_file()?
            .entries
            .get(key)
            .map(|entry| entry.value.clone()))
    }

    fn write_value(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut file = match self.read_file() {
            Ok(file) => file,
            Err(StorageError::Serialization(e)) => {
                eprintln!(
                    "Warning: Discarding unreadable store file {}: {}",
                    self.path.display(),
                    e
                );
                StoreFile::default()
            }
            Err(e) => return Err(e),
        };
        file.entries.insert(
            key.to_string(),
            StoredValue {
                value: value.to_string(),
                updated: Local::now().to_rfc3339(),
            },
        );

        fs::create_dir_all(self.directory())?;
        let json = serde_json::to_string_pretty(&file)?;

        // Replace the file in one step so a failed write leaves the old one
        let staging = self.staging_path();
        fs::write(&staging, json)?;
        if let Err(e) = fs::rename(&staging, &self.path) {
            let _ = fs::remove_file(&staging);
            return Err(e.into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn temp_path(name: &str) -> PathBuf {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        let id = COUNTER.fetch_add(1, Ordering::Relaxed);
        std::env::temp_dir()
            .join(format!("a7800-frontend-{}-{}", std::process::id(), id))
            .join(name)
    }

    #[test]
    fn test_storage_error_display() {
        assert_eq!(StorageError::Unavailable.to_string(), "Storage is not available");
        assert_eq!(
            StorageError::Backend("disk full".to_string()).to_string(),
            "Storage error: disk full"
        );
    }

    #[test]
    fn test_storage_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "test");
        let err: StorageError = io_err.into();
        assert!(matches!(err, StorageError::Io(_)));
    }

    #[test]
    fn test_memory_store_read_write() {
        let mut store = MemoryStore::new();
        assert!(store.is_available());
        assert_eq!(store.read_value("k").unwrap(), None);

        store.write_value("k", "v").unwrap();
        assert_eq!(store.read_value("k").unwrap().as_deref(), Some("v"));
        assert_eq!(store.write_count(), 1);
        assert_eq!(store.read_count(), 2);
    }

    #[test]
    fn test_memory_store_failures() {
        let mut store = MemoryStore::new();
        store.set_fail_reads(true);
        store.set_fail_writes(true);

        assert!(matches!(store.read_value("k"), Err(StorageError::Backend(_))));
        assert!(store.write_value("k", "v").is_err());
        assert_eq!(store.get("k"), None);
    }

    #[test]
    fn test_memory_store_unavailable() {
        let mut store = MemoryStore::unavailable();
        assert!(!store.is_available());
        assert!(matches!(store.read_value("k"), Err(StorageError::Unavailable)));
        assert!(matches!(
            store.write_value("k", "v"),
            Err(StorageError::Unavailable)
        ));
    }

    #[test]
    fn test_file_store_missing_file_reads_none() {
        let store = FileStore::new(temp_path("missing.json"));
        assert_eq!(store.read_value("highScoreSRAM").unwrap(), None);
    }

    #[test]
    fn test_file_store_round_trip() {
        let path = temp_path("store.json");
        let mut store = FileStore::new(&path);
        assert!(store.is_available());

        store.write_value("a", "first").unwrap();
        store.write_value("b", "second").unwrap();
        store.write_value("a", "third").unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.read_value("a").unwrap().as_deref(), Some("third"));
        assert_eq!(reopened.read_value("b").unwrap().as_deref(), Some("second"));
        assert!(reopened.last_updated("a").unwrap().is_some());
        assert_eq!(reopened.last_updated("c").unwrap(), None);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_file_store_corrupt_file() {
        let path = temp_path("corrupt.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();

        let store = FileStore::new(&path);
        assert!(matches!(
            store.read_value("a"),
            Err(StorageError::Serialization(_))
        ));

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_file_store_write_replaces_truncated_file() {
        let path = temp_path("truncated.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"{"entries":{"highScoreSRAM":{"value":"AA"#).unwrap();

        let mut store = FileStore::new(&path);
        assert!(store.is_available());
        for value in ["AAAA", "BBBB"] {
            store.write_value("highScoreSRAM", value).unwrap();
        }

        assert_eq!(
            store.read_value("highScoreSRAM").unwrap().as_deref(),
            Some("BBBB")
        );
        assert!(!store.staging_path().exists());

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_file_store_availability_creates_nothing() {
        let path = temp_path("nested/deeper/store.json");
        let root = path.parent().unwrap().parent().unwrap().parent().unwrap();
        let _ = fs::remove_dir_all(root);

        let mut store = FileStore::new(&path);
        assert!(store.is_available());
        assert!(!root.exists());

        store.write_value("k", "v").unwrap();
        assert!(path.is_file());

        let _ = fs::remove_dir_all(root);
    }
}
