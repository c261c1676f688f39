use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::Path;

pub const RECENT_CAPACITY: usize = 5;

/// Most-recent-first set of searched names, deduplicated case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct RecentSearches {
    capacity: usize,
    entries: VecDeque<String>,
}

impl Default for RecentSearches {
    fn default() -> Self {
        Self::with_capacity(RECENT_CAPACITY)
    }
}

impl RecentSearches {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Moves `name` to the front, dropping any earlier spelling of it and
    /// the oldest entry once over capacity.
    pub fn push(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() || self.capacity == 0 {
            return;
        }

        let key = name.to_lowercase();
        self.entries.retain(|existing| existing.to_lowercase() != key);
        self.entries.push_front(name.to_string());
        self.entries.truncate(self.capacity);
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A missing file is an empty list.
    pub fn load(path: &Path) -> io::Result<Self> {
        match fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string(self).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, raw)
    }
}

impl From<Vec<String>> for RecentSearches {
    fn from(stored: Vec<String>) -> Self {
        // Replay oldest first so the stored order, cap and dedup all hold
        let mut recent = Self::default();
        for name in stored.iter().rev() {
            recent.push(name);
        }
        recent
    }
}

impl From<RecentSearches> for Vec<String> {
    fn from(recent: RecentSearches) -> Self {
        recent.entries.into_iter().collect()
    }
}
