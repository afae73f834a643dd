#![forbid(unsafe_code)]

//! Pluggable key-value storage backends for saved layouts.
//!
//! # Design Invariants
//!
//! 1. **Graceful degradation**: storage failures never panic; operations
//!    return `Result`.
//! 2. **Atomic writes**: file storage uses the write-then-rename pattern to
//!    prevent corruption.
//! 3. **Partial tolerance**: a corrupt store file loses only that file's
//!    contents; readers fall back to empty, never crash.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::RwLock;

/// Errors that can occur during storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// I/O error during file operations.
    Io(std::io::Error),
    /// Serialization or deserialization error.
    Serialization(String),
    /// Storage content is corrupted or in an invalid format.
    Corruption(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "I/O error: {e}"),
            StorageError::Serialization(msg) => write!(f, "serialization error: {msg}"),
            StorageError::Corruption(msg) => write!(f, "storage corruption: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(e) => Some(e),
            StorageError::Serialization(_) | StorageError::Corruption(_) => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e)
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// A durable key-value collaborator. Values are JSON text.
pub trait StorageBackend: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Read the value stored under `key`, if any.
    fn read(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    fn write(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove the value under `key`. Removing a missing key is a no-op.
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// Check if the backend is available and functional.
    fn is_available(&self) -> bool {
        true
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Memory storage
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory storage backend for testing and ephemeral sessions.
///
/// State is lost when the process exits.
#[derive(Default)]
pub struct MemoryStorage {
    data: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create memory storage pre-populated with entries.
    #[must_use]
    pub fn with_entries(entries: HashMap<String, String>) -> Self {
        Self {
            data: RwLock::new(entries),
        }
    }
}

impl StorageBackend for MemoryStorage {
    fn name(&self) -> &str {
        "MemoryStorage"
    }

    fn read(&self, key: &str) -> StorageResult<Option<String>> {
        let guard = self
            .data
            .read()
            .map_err(|_| StorageError::Corruption("lock poisoned".into()))?;
        Ok(guard.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| StorageError::Corruption("lock poisoned".into()))?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| StorageError::Corruption("lock poisoned".into()))?;
        guard.remove(key);
        Ok(())
    }
}

impl fmt::Debug for MemoryStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.data.read().map(|g| g.len()).unwrap_or(0);
        f.debug_struct("MemoryStorage").field("entries", &count).finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File storage
// ─────────────────────────────────────────────────────────────────────────────

mod file_storage {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::fs::{self, File};
    use std::io::{BufReader, BufWriter, Write};
    use std::path::{Path, PathBuf};

    /// File format for the store (JSON).
    #[derive(Serialize, Deserialize)]
    struct StoreFile {
        /// Format version for future migrations.
        format_version: u32,
        /// Map of key to JSON value text.
        entries: BTreeMap<String, String>,
    }

    impl StoreFile {
        const FORMAT_VERSION: u32 = 1;

        fn new() -> Self {
            Self {
                format_version: Self::FORMAT_VERSION,
                entries: BTreeMap::new(),
            }
        }
    }

    /// JSON-file storage backend with atomic writes.
    ///
    /// All keys live in one file. Each write loads the current entries,
    /// applies the change, writes a sibling temp file, and renames it over
    /// the original so a crash never leaves a half-written store.
    #[derive(Debug)]
    pub struct FileStorage {
        path: PathBuf,
    }

    impl FileStorage {
        /// Create a file storage backed by `path`. The file is created on
        /// first write; the parent directory must exist or be creatable.
        #[must_use]
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        /// The file this storage is backed by.
        #[must_use]
        pub fn path(&self) -> &Path {
            &self.path
        }

        fn load(&self) -> StorageResult<StoreFile> {
            if !self.path.exists() {
                return Ok(StoreFile::new());
            }
            let file = File::open(&self.path)?;
            let store: StoreFile = serde_json::from_reader(BufReader::new(file))
                .map_err(|e| StorageError::Corruption(format!("invalid store file: {e}")))?;
            if store.format_version != StoreFile::FORMAT_VERSION {
                return Err(StorageError::Corruption(format!(
                    "unsupported store format version {}",
                    store.format_version
                )));
            }
            Ok(store)
        }

        fn persist(&self, store: &StoreFile) -> StorageResult<()> {
            if let Some(parent) = self.path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)?;
            }
            let tmp = self.path.with_extension("tmp");
            {
                let file = File::create(&tmp)?;
                let mut writer = BufWriter::new(file);
                serde_json::to_writer(&mut writer, store)
                    .map_err(|e| StorageError::Serialization(e.to_string()))?;
                writer.flush()?;
            }
            fs::rename(&tmp, &self.path)?;
            Ok(())
        }
    }

    impl StorageBackend for FileStorage {
        fn name(&self) -> &str {
            "FileStorage"
        }

        fn read(&self, key: &str) -> StorageResult<Option<String>> {
            Ok(self.load()?.entries.get(key).cloned())
        }

        fn write(&self, key: &str, value: &str) -> StorageResult<()> {
            let mut store = self.load().unwrap_or_else(|e| {
                tracing::warn!(error = %e, "store file unreadable, starting fresh");
                StoreFile::new()
            });
            store.entries.insert(key.to_string(), value.to_string());
            self.persist(&store)
        }

        fn remove(&self, key: &str) -> StorageResult<()> {
            let mut store = match self.load() {
                Ok(store) => store,
                // Nothing readable means nothing to remove.
                Err(_) => return Ok(()),
            };
            if store.entries.remove(key).is_some() {
                self.persist(&store)?;
            }
            Ok(())
        }
    }
}

pub use file_storage::FileStorage;
