//! Recent-search history.
//!
//! The list is ordered most-recent-first, holds at most [`MAX_HISTORY`]
//! names, and never holds two names that differ only by case or
//! surrounding whitespace. The latest spelling of a name wins.

use std::sync::Arc;

use crate::preferences::{read_value, write_value, KEY_HISTORY, KEY_LAST_CITY};
use crate::store::KeyValueStore;

pub const MAX_HISTORY: usize = 8;

fn same_city(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

pub struct HistoryManager {
    store: Arc<dyn KeyValueStore>,
    entries: Vec<String>,
    last_city: Option<String>,
}

impl HistoryManager {
    /// Load history and the last resolved city from `store`.
    ///
    /// A stored list that is unreadable starts over empty; one that breaks
    /// the dedup/length rules is repaired in memory.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let entries = read_value(store.as_ref(), KEY_HISTORY)
            .map(|raw| match serde_json::from_str::<Vec<String>>(&raw) {
                Ok(list) => normalize(list),
                Err(e) => {
                    tracing::warn!("Discarding unreadable search history: {}", e);
                    Vec::new()
                }
            })
            .unwrap_or_default();
        let last_city = read_value(store.as_ref(), KEY_LAST_CITY)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        tracing::debug!("Loaded {} history entries", entries.len());
        Self {
            store,
            entries,
            last_city,
        }
    }

    /// Most recent first
    pub fn list(&self) -> &[String] {
        &self.entries
    }

    pub fn last_city(&self) -> Option<&str> {
        self.last_city.as_deref()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record a successfully resolved city: move it to the front, drop the
    /// oldest entry past the cap, and remember it as the last city.
    pub fn record_success(&mut self, city: &str) {
        let normalized = city.trim();
        if normalized.is_empty() {
            return;
        }

        self.entries.retain(|c| !same_city(c, normalized));
        self.entries.insert(0, normalized.to_string());
        self.entries.truncate(MAX_HISTORY);
        self.last_city = Some(normalized.to_string());

        write_value(self.store.as_ref(), KEY_LAST_CITY, normalized);
        self.persist();
    }

    /// Remove the matching entry, if any. Returns whether one was removed.
    pub fn remove(&mut self, city: &str) -> bool {
        match self.entries.iter().position(|c| same_city(c, city)) {
            Some(idx) => {
                self.entries.remove(idx);
                self.persist();
                true
            }
            None => false,
        }
    }

    /// Forget every entry. The last city is kept.
    pub fn clear(&mut self) {
        if self.entries.is_empty() {
            return;
        }
        self.entries.clear();
        self.persist();
    }

    fn persist(&self) {
        match serde_json::to_string(&self.entries) {
            Ok(json) => write_value(self.store.as_ref(), KEY_HISTORY, &json),
            Err(e) => tracing::warn!("Failed to serialize search history: {}", e),
        }
    }
}

/// Trim, drop blanks and later duplicates, cap the length
fn normalize(list: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(MAX_HISTORY);
    for city in list {
        let city = city.trim();
        if city.is_empty() || out.iter().any(|c| same_city(c, city)) {
            continue;
        }
        out.push(city.to_string());
        if out.len() == MAX_HISTORY {
            break;
        }
    }
    out
}
