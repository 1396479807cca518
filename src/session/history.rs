/*!
 * Recent project history.
 *
 * Newest entries come first and the list never grows past its capacity.
 * The history is plain serde data so any key-value store can persist it.
 */

use chrono::Utc;
use log::debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ProjectError;
use crate::subtitle_processor::Segment;

/// Entries kept by default
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// One snapshot of a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    /// Display name, usually the source file name
    pub name: String,
    /// Unix time in milliseconds
    pub timestamp: i64,
    pub segments: Vec<Segment>,
}

/// Bounded, newest-first list of project snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectHistory {
    entries: Vec<HistoryEntry>,
    #[serde(skip, default = "default_capacity")]
    capacity: usize,
}

fn default_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}

impl Default for ProjectHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl ProjectHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Store a snapshot in front, dropping the oldest entries over capacity
    pub fn record(&mut self, name: &str, segments: &[Segment]) -> &HistoryEntry {
        let entry = HistoryEntry {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            timestamp: Utc::now().timestamp_millis(),
            segments: segments.to_vec(),
        };
        debug!("Recording '{}' in history ({} segment(s))", name, segments.len());

        self.entries.insert(0, entry);
        self.entries.truncate(self.capacity);
        &self.entries[0]
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Remove one entry; returns whether it existed
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> Result<String, ProjectError> {
        serde_json::to_string(&self.entries).map_err(|e| ProjectError::Serialize(e.to_string()))
    }

    /// Load a stored history, keeping only the newest `capacity` entries
    pub fn from_json(json: &str, capacity: usize) -> Result<Self, ProjectError> {
        let mut entries: Vec<HistoryEntry> =
            serde_json::from_str(json).map_err(|e| ProjectError::InvalidJson(e.to_string()))?;
        let mut history = Self::with_capacity(capacity);
        entries.truncate(history.capacity);
        history.entries = entries;
        Ok(history)
    }
}
