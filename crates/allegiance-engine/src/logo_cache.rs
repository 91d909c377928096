//! Reference-counted logo handles.
//!
//! The cache hands out one handle per logo path and counts how many
//! factions hold it. It never decodes image data; the renderer resolves a
//! handle back to its path when it needs pixels.

use std::path::PathBuf;

use ahash::AHashMap;
use allegiance_common::LogoHandle;
use allegiance_gameplay::logo::LogoStore;
use tracing::{debug, warn};

#[derive(Debug)]
struct Entry {
    path: String,
    refs: u32,
}

/// Logo store backed by files under an asset root.
#[derive(Debug, Default)]
pub struct LogoCache {
    /// Asset root; when set, logos must exist on disk
    root: Option<PathBuf>,
    by_path: AHashMap<String, LogoHandle>,
    entries: AHashMap<LogoHandle, Entry>,
    next: u32,
}

impl LogoCache {
    /// Creates a cache that accepts any path.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a cache that only hands out logos present under `root`.
    #[must_use]
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            ..Self::default()
        }
    }

    /// Path a handle was acquired for.
    #[must_use]
    pub fn path(&self, handle: LogoHandle) -> Option<&str> {
        self.entries.get(&handle).map(|e| e.path.as_str())
    }

    /// Number of holders of a handle.
    #[must_use]
    pub fn ref_count(&self, handle: LogoHandle) -> u32 {
        self.entries.get(&handle).map_or(0, |e| e.refs)
    }

    /// Number of distinct logos currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks if no logo is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl LogoStore for LogoCache {
    fn acquire(&mut self, path: &str) -> Option<LogoHandle> {
        if let Some(&handle) = self.by_path.get(path) {
            if let Some(entry) = self.entries.get_mut(&handle) {
                entry.refs += 1;
                return Some(handle);
            }
        }

        if let Some(root) = &self.root {
            if !root.join(path).is_file() {
                debug!("Logo not found under {:?}: {}", root, path);
                return None;
            }
        }

        self.next += 1;
        let handle = LogoHandle::new(self.next);
        self.by_path.insert(path.to_string(), handle);
        self.entries.insert(
            handle,
            Entry {
                path: path.to_string(),
                refs: 1,
            },
        );
        Some(handle)
    }

    fn release(&mut self, handle: LogoHandle) {
        let Some(entry) = self.entries.get_mut(&handle) else {
            warn!("Release of unknown logo handle {:?}", handle);
            return;
        };
        entry.refs -= 1;
        if entry.refs == 0 {
            if let Some(entry) = self.entries.remove(&handle) {
                self.by_path.remove(&entry.path);
            }
        }
    }
}
