//! Process-lifetime response cache.

use std::collections::HashMap;

use log::debug;

/// Maps a canonical URL string to its rendered response text.
///
/// Entries never expire and are never evicted; the cache lives only as long
/// as one process invocation, so a repeated fetch of the same URL within a
/// run skips the network entirely.
#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: HashMap<String, String>,
}

impl ResponseCache {
    /// Empty cache.
    pub fn new() -> Self {
        ResponseCache::default()
    }

    /// Rendered text for `key`, when present.
    pub fn get(&self, key: &str) -> Option<&str> {
        let hit = self.entries.get(key).map(String::as_str);
        if hit.is_some() {
            debug!("Cache hit for {key}");
        }
        hit
    }

    /// Stores the rendered text for `key`, replacing any previous entry.
    pub fn put(&mut self, key: String, rendered: String) {
        self.entries.insert(key, rendered);
    }
}
