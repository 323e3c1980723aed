//! Pending-search handoff slot.
//!
//! A context-menu trigger on an arbitrary page writes the slot; the UI reads
//! it once on its next activation, at an unknown future time. The staleness
//! window keeps a long-forgotten trigger from resurrecting an unwanted
//! search.

use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use moctale_core::error::{Error, Result};
use moctale_core::traits::HandoffStore;

pub const DEFAULT_STALENESS: Duration = Duration::from_secs(5 * 60);

/// The single persisted slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct HandoffRecord {
    query: String,
    created_at: u64,
}

fn now_unix() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn is_fresh(record: &HandoffRecord, staleness: Duration) -> bool {
    now_unix().saturating_sub(record.created_at) < staleness.as_secs()
}

// =============================================================================
// In-memory store
// =============================================================================

/// Volatile slot for tests and single-process setups.
pub struct MemoryHandoffStore {
    slot: Mutex<Option<HandoffRecord>>,
    staleness: Duration,
}

impl MemoryHandoffStore {
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
            staleness: DEFAULT_STALENESS,
        }
    }

    pub fn with_staleness(mut self, staleness: Duration) -> Self {
        self.staleness = staleness;
        self
    }
}

impl Default for MemoryHandoffStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HandoffStore for MemoryHandoffStore {
    async fn write(&self, query: &str) -> Result<()> {
        *self.slot.lock().unwrap() = Some(HandoffRecord {
            query: query.to_string(),
            created_at: now_unix(),
        });
        Ok(())
    }

    async fn read_if_fresh(&self) -> Result<Option<String>> {
        let slot = self.slot.lock().unwrap();
        Ok(slot
            .as_ref()
            .filter(|record| is_fresh(record, self.staleness))
            .map(|record| record.query.clone()))
    }

    async fn clear(&self) -> Result<()> {
        *self.slot.lock().unwrap() = None;
        Ok(())
    }
}

// =============================================================================
// File-backed store
// =============================================================================

/// Durable slot in a JSON file. The only coordinator state that survives a
/// restart.
pub struct FileHandoffStore {
    path: PathBuf,
    staleness: Duration,
}

impl FileHandoffStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            staleness: DEFAULT_STALENESS,
        }
    }

    pub fn with_staleness(mut self, staleness: Duration) -> Self {
        self.staleness = staleness;
        self
    }

    fn load(&self) -> Result<Option<HandoffRecord>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| Error::storage(format!("failed to read handoff slot: {}", e)))?;
        let record = serde_json::from_str(&content)
            .map_err(|e| Error::storage(format!("failed to parse handoff slot: {}", e)))?;
        Ok(Some(record))
    }
}

#[async_trait]
impl HandoffStore for FileHandoffStore {
    async fn write(&self, query: &str) -> Result<()> {
        let record = HandoffRecord {
            query: query.to_string(),
            created_at: now_unix(),
        };
        let content = serde_json::to_string(&record)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::storage(format!("failed to create handoff dir: {}", e)))?;
        }
        std::fs::write(&self.path, content)
            .map_err(|e| Error::storage(format!("failed to write handoff slot: {}", e)))?;
        tracing::debug!(path = %self.path.display(), "pending search stored");
        Ok(())
    }

    async fn read_if_fresh(&self) -> Result<Option<String>> {
        // A stale record is left in place; reading never mutates storage.
        Ok(self
            .load()?
            .filter(|record| is_fresh(record, self.staleness))
            .map(|record| record.query))
    }

    async fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::storage(format!(
                "failed to clear handoff slot: {}",
                e
            ))),
        }
    }
}
