//! Content-addressed storage for analyzed strings
//!
//! Entries are keyed by their content hash with a secondary index from the
//! exact original value to that hash. Both indices live behind one lock so
//! every operation, including duplicate-check-then-insert, is a single
//! critical section.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::entry::{AnalyzedEntry, EntryId};
use crate::error::{AnalyzerError, Result};

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Number of entries the indices are pre-sized for
    pub initial_capacity: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 1024,
        }
    }
}

impl StorageConfig {
    /// Create config with a specific initial capacity
    pub fn with_capacity(initial_capacity: usize) -> Self {
        Self { initial_capacity }
    }
}

struct StoredEntry {
    sequence: u64,
    entry: AnalyzedEntry,
}

struct StoreInner {
    by_id: HashMap<EntryId, StoredEntry>,
    id_by_value: HashMap<String, EntryId>,
    next_sequence: u64,
    /// Timestamp handed to the most recent insert
    last_created_at: Option<DateTime<Utc>>,
}

impl StoreInner {
    /// Insertion timestamp, strictly later than every earlier one
    fn next_created_at(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let created_at = match self.last_created_at {
            Some(last) if now <= last => last + Duration::nanoseconds(1),
            _ => now,
        };
        self.last_created_at = Some(created_at);
        created_at
    }
}

/// Concurrent content-addressed store
pub struct StringStore {
    inner: Arc<RwLock<StoreInner>>,
    config: StorageConfig,
}

impl StringStore {
    /// Create a new store
    pub fn new(config: StorageConfig) -> Self {
        let inner = StoreInner {
            by_id: HashMap::with_capacity(config.initial_capacity),
            id_by_value: HashMap::with_capacity(config.initial_capacity),
            next_sequence: 0,
            last_created_at: None,
        };
        Self {
            inner: Arc::new(RwLock::new(inner)),
            config,
        }
    }

    /// Create with default configuration
    pub fn with_defaults() -> Self {
        Self::new(StorageConfig::default())
    }

    /// Insert an entry, rejecting it if its id is already stored
    ///
    /// `created_at` is stamped here, under the write guard, so newer
    /// timestamps always belong to later inserts. Returns the stored entry.
    pub async fn insert(&self, mut entry: AnalyzedEntry) -> Result<AnalyzedEntry> {
        let id = entry.id.clone();
        let mut inner = self.inner.write().await;

        if inner.by_id.contains_key(&id) {
            tracing::debug!(id = %id, "rejecting duplicate entry");
            return Err(AnalyzerError::Duplicate(id.to_string()));
        }

        let sequence = inner.next_sequence;
        inner.next_sequence += 1;
        entry.created_at = inner.next_created_at();
        inner
            .id_by_value
            .insert(entry.original_value.clone(), id.clone());
        inner.by_id.insert(
            id.clone(),
            StoredEntry {
                sequence,
                entry: entry.clone(),
            },
        );

        tracing::debug!(id = %id, sequence, "stored entry");
        Ok(entry)
    }

    /// Exact lookup by original value
    pub async fn get_by_value(&self, value: &str) -> Option<AnalyzedEntry> {
        let inner = self.inner.read().await;
        let id = inner.id_by_value.get(value)?;
        inner.by_id.get(id).map(|stored| stored.entry.clone())
    }

    /// Lookup by content hash
    pub async fn get_by_id(&self, id: &EntryId) -> Option<AnalyzedEntry> {
        let inner = self.inner.read().await;
        inner.by_id.get(id).map(|stored| stored.entry.clone())
    }

    /// Check whether a value is stored
    pub async fn contains_value(&self, value: &str) -> bool {
        self.inner.read().await.id_by_value.contains_key(value)
    }

    /// Snapshot of every entry, in insertion order
    pub async fn list_all(&self) -> Vec<AnalyzedEntry> {
        let inner = self.inner.read().await;
        let mut stored: Vec<&StoredEntry> = inner.by_id.values().collect();
        stored.sort_by_key(|s| s.sequence);
        stored.into_iter().map(|s| s.entry.clone()).collect()
    }

    /// Remove an entry by original value
    ///
    /// Returns the removed entry, or `None` if the value was not stored.
    pub async fn delete_by_value(&self, value: &str) -> Option<AnalyzedEntry> {
        let mut inner = self.inner.write().await;
        let id = inner.id_by_value.remove(value)?;
        let removed = inner.by_id.remove(&id).map(|stored| stored.entry);
        tracing::debug!(id = %id, "deleted entry");
        removed
    }

    /// Number of stored entries
    pub async fn len(&self) -> usize {
        self.inner.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Remove every entry
    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        inner.by_id.clear();
        inner.id_by_value.clear();
    }

    /// Get storage statistics
    pub async fn stats(&self) -> StorageStats {
        let inner = self.inner.read().await;
        let created = inner.by_id.values().map(|s| s.entry.created_at);

        StorageStats {
            entries: inner.by_id.len(),
            oldest: created.clone().min(),
            newest: created.max(),
            initial_capacity: self.config.initial_capacity,
        }
    }
}

/// Storage statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageStats {
    /// Number of stored entries
    pub entries: usize,
    /// Creation time of the oldest entry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oldest: Option<DateTime<Utc>>,
    /// Creation time of the newest entry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newest: Option<DateTime<Utc>>,
    /// Configured initial capacity
    pub initial_capacity: usize,
}
