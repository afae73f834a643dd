#![forbid(unsafe_code)]

//! Durable persistence for Gridplan layouts.
//!
//! Two logical keys live in a pluggable key-value backend: the list of
//! saved-layout records and the id of the currently-selected layout. Both
//! reads are validated and sanitized before use; invalid entries are
//! silently dropped (and logged) rather than crashing the caller.

pub mod backend;
pub mod codec;

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

pub use backend::{FileStorage, MemoryStorage, StorageBackend, StorageError, StorageResult};
pub use codec::{CodecError, RestoredState, Snapshot, decode, encode, from_json, to_json};

/// Storage key holding the saved-layout list.
pub const LAYOUTS_KEY: &str = "gridplan.layouts";

/// Storage key holding the currently-selected layout id.
pub const SELECTED_LAYOUT_KEY: &str = "gridplan.selectedLayout";

/// Schema version of [`SavedLayout`] records.
pub const LAYOUT_SCHEMA_VERSION: u32 = 1;

/// A named, timestamped layout record wrapping a document snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedLayout {
    pub schema_version: u32,
    pub id: String,
    pub name: String,
    /// Milliseconds since the Unix epoch.
    pub created_at: u64,
    /// Milliseconds since the Unix epoch.
    pub updated_at: u64,
    pub data: Snapshot,
}

/// Metadata about a saved layout, for list views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutMeta {
    pub id: String,
    pub name: String,
    pub created_at: u64,
    pub updated_at: u64,
}

impl From<&SavedLayout> for LayoutMeta {
    fn from(layout: &SavedLayout) -> Self {
        Self {
            id: layout.id.clone(),
            name: layout.name.clone(),
            created_at: layout.created_at,
            updated_at: layout.updated_at,
        }
    }
}

/// Time source for layout timestamps. A seam so tests are deterministic.
pub trait Clock: Send + Sync {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> u64;
}

/// Wall-clock time.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        web_time::SystemTime::now()
            .duration_since(web_time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// A fixed, manually-advanced clock for tests.
#[derive(Debug, Default)]
pub struct FixedClock {
    ms: AtomicU64,
}

impl FixedClock {
    /// Create a clock stuck at `ms`.
    #[must_use]
    pub fn new(ms: u64) -> Self {
        Self {
            ms: AtomicU64::new(ms),
        }
    }

    /// Advance the clock.
    pub fn advance(&self, delta_ms: u64) {
        self.ms.fetch_add(delta_ms, Ordering::Relaxed);
    }
}

impl Clock for FixedClock {
    fn now_ms(&self) -> u64 {
        self.ms.load(Ordering::Relaxed)
    }
}

/// Reads and writes the saved-layout list and the selected-layout id.
pub struct LayoutStore {
    backend: Box<dyn StorageBackend>,
}

impl LayoutStore {
    /// Create a layout store over the given backend.
    #[must_use]
    pub fn new(backend: Box<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// Create a layout store over an in-memory backend.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStorage::new()))
    }

    /// Load all valid saved layouts.
    ///
    /// Records that fail structural validation (wrong schema version,
    /// corrupt snapshot) are dropped with a warning; a corrupt or missing
    /// list yields an empty one.
    #[must_use]
    pub fn load_layouts(&self) -> Vec<SavedLayout> {
        let raw = match self.backend.read(LAYOUTS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(backend = self.backend.name(), error = %e, "layout list unreadable");
                return Vec::new();
            }
        };
        let values: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
            Ok(values) => values,
            Err(e) => {
                tracing::warn!(error = %e, "layout list is not a JSON array, discarding");
                return Vec::new();
            }
        };

        let mut layouts = Vec::with_capacity(values.len());
        for value in values {
            match serde_json::from_value::<SavedLayout>(value) {
                Ok(layout) if layout.schema_version == LAYOUT_SCHEMA_VERSION => {
                    // The snapshot itself must decode; open() will sanitize.
                    match codec::decode(&layout.data) {
                        Ok(_) => layouts.push(layout),
                        Err(e) => {
                            tracing::warn!(id = %layout.id, error = %e, "dropping layout with corrupt snapshot");
                        }
                    }
                }
                Ok(layout) => {
                    tracing::warn!(id = %layout.id, version = layout.schema_version, "dropping layout with unsupported schema");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "dropping malformed layout record");
                }
            }
        }
        layouts
    }

    /// Replace the saved-layout list.
    pub fn save_layouts(&self, layouts: &[SavedLayout]) -> StorageResult<()> {
        let json = serde_json::to_string(layouts)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.backend.write(LAYOUTS_KEY, &json)
    }

    /// The currently-selected layout id, if any.
    #[must_use]
    pub fn selected_layout_id(&self) -> Option<String> {
        let raw = self.backend.read(SELECTED_LAYOUT_KEY).ok().flatten()?;
        match serde_json::from_str::<String>(&raw) {
            Ok(id) if !id.is_empty() => Some(id),
            _ => {
                tracing::warn!("selected-layout key is malformed, ignoring");
                None
            }
        }
    }

    /// Set or clear the currently-selected layout id.
    pub fn set_selected_layout_id(&self, id: Option<&str>) -> StorageResult<()> {
        match id {
            Some(id) => {
                let json = serde_json::to_string(id)
                    .map_err(|e| StorageError::Serialization(e.to_string()))?;
                self.backend.write(SELECTED_LAYOUT_KEY, &json)
            }
            None => self.backend.remove(SELECTED_LAYOUT_KEY),
        }
    }
}

impl std::fmt::Debug for LayoutStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutStore")
            .field("backend", &self.backend.name())
            .finish()
    }
}
