//! # Ping Statistics
//!
//! The latest ping reported by each server, keyed by `serverId`, mirrored to a JSON
//! file. Writes go to memory; a background task flushes to disk when something
//! changed.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::StatsError;

#[derive(Debug)]
pub struct StatsStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, Value>>,
    dirty: AtomicBool,
}

impl StatsStore {
    /// Opens the store backed by `path`.
    ///
    /// A missing, blank or unreadable file yields an empty store. Older files that
    /// kept a history array per server are reduced to the last entry.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match read_entries(&path) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Failed to load {}: {e}", path.display());
                BTreeMap::new()
            }
        };
        debug!(servers = entries.len(), path = %path.display(), "loaded stats");

        Self {
            path,
            entries: RwLock::new(entries),
            dirty: AtomicBool::new(false),
        }
    }

    /// Replaces the latest ping for `server_id`.
    pub fn record(&self, server_id: impl Into<String>, ping: Value) {
        self.entries.write().insert(server_id.into(), ping);
        self.dirty.store(true, Ordering::Release);
    }

    pub fn get(&self, server_id: &str) -> Option<Value> {
        self.entries.read().get(server_id).cloned()
    }

    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        self.entries.read().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Writes the map to disk if it changed since the last flush.
    ///
    /// Returns `Ok(false)` when there was nothing to write. The file is replaced via
    /// a sibling temp file and a rename, so readers never see a torn write.
    pub fn flush(&self) -> Result<bool, StatsError> {
        if !self.dirty.swap(false, Ordering::AcqRel) {
            return Ok(false);
        }

        let result = self.write_to_disk();
        if result.is_err() {
            self.dirty.store(true, Ordering::Release);
        }
        result.map(|()| true)
    }

    fn write_to_disk(&self) -> Result<(), StatsError> {
        let json = serde_json::to_string_pretty(&*self.entries.read())?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        std::fs::write(&tmp, json).map_err(|source| StatsError::Io {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|source| StatsError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(())
    }
}

fn read_entries(path: &Path) -> Result<BTreeMap<String, Value>, StatsError> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }

    let raw = std::fs::read_to_string(path).map_err(|source| StatsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if raw.trim().is_empty() {
        return Ok(BTreeMap::new());
    }

    let parsed: BTreeMap<String, Value> = serde_json::from_str(&raw)?;
    let entries = parsed
        .into_iter()
        .filter_map(|(server_id, value)| match value {
            Value::Array(mut history) => history.pop().map(|last| (server_id, last)),
            Value::Object(_) => Some((server_id, value)),
            _ => None,
        })
        .collect();
    Ok(entries)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
