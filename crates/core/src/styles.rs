//! Per-container style registry.
//!
//! Plays the role of the page's `<head>`: each container gets at most one
//! style sheet, however many engines or renders touch it. Entries live until
//! the container is released.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;

#[derive(Debug, Default)]
pub struct StyleRegistry {
    sheets: DashMap<String, String>,
}

impl StyleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the sheet built by `factory` unless the container already
    /// has one. The factory only runs on first install. Returns `true` when
    /// a sheet was installed by this call.
    pub fn ensure_installed<F>(&self, container_id: &str, factory: F) -> bool
    where
        F: FnOnce() -> String,
    {
        match self.sheets.entry(container_id.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(factory());
                debug!(container_id = %container_id, "Installed quiz style sheet");
                true
            }
        }
    }

    pub fn is_installed(&self, container_id: &str) -> bool {
        self.sheets.contains_key(container_id)
    }

    pub fn get(&self, container_id: &str) -> Option<String> {
        self.sheets.get(container_id).map(|r| r.value().clone())
    }

    /// Drops the container's sheet. Returns `true` if one was installed.
    pub fn release(&self, container_id: &str) -> bool {
        self.sheets.remove(container_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}
