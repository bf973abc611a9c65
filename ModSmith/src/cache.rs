//! Parsed document caching for repeated game file access
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use crate::archive::ArchiveSource;
use crate::error::Result;
use crate::schema::{Document, Registry};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

struct CacheEntry {
    modified: SystemTime,
    document: Document,
}

/// Cache of loaded documents, keyed by file path and invalidated when the
/// file's modification time changes.
///
/// Lookups hand out clones, so callers can merge content into what they get
/// back without disturbing the cached copy.
pub struct DocumentCache {
    /// Cached documents keyed by resolved file path
    entries: HashMap<PathBuf, CacheEntry>,
    /// Maximum number of documents to hold
    max_entries: usize,
    /// Access order for LRU eviction (most recent at end)
    access_order: Vec<PathBuf>,
}

impl DocumentCache {
    /// Create a new cache holding at most `max_entries` documents
    #[must_use]
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            max_entries: max_entries.max(1),
            access_order: Vec::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every cached document
    pub fn clear(&mut self) {
        self.entries.clear();
        self.access_order.clear();
    }

    /// Drop the cached document for one path, if any
    pub fn invalidate(&mut self, path: &Path) {
        self.entries.remove(path);
        self.access_order.retain(|p| p != path);
    }

    /// Load a document through the registry, reusing the cached parse while
    /// the file is unchanged.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or does not load.
    pub fn load(&mut self, registry: &Registry, path: impl AsRef<Path>) -> Result<Document> {
        let path = path.as_ref();
        let modified = fs::metadata(path)?.modified()?;

        if let Some(entry) = self.entries.get(path) {
            if entry.modified == modified {
                let document = entry.document.clone();
                self.update_access_order(path);
                return Ok(document);
            }
            tracing::debug!("Cache entry stale, reloading {}", path.display());
        }

        let document = registry.load(path)?;

        // Evict oldest entry if at capacity
        if !self.entries.contains_key(path) {
            while self.entries.len() >= self.max_entries && !self.access_order.is_empty() {
                let to_evict = self.access_order.remove(0);
                self.entries.remove(&to_evict);
            }
        }

        self.entries.insert(
            path.to_path_buf(),
            CacheEntry {
                modified,
                document: document.clone(),
            },
        );
        self.update_access_order(path);
        Ok(document)
    }

    /// Resolve a virtual path through `source`, then [`load`](Self::load) it.
    ///
    /// # Errors
    /// Returns an error if the path does not resolve or the file does not load.
    pub fn load_virtual(
        &mut self,
        registry: &Registry,
        source: &dyn ArchiveSource,
        virtual_path: &str,
    ) -> Result<Document> {
        let path = source.get_path(virtual_path)?;
        self.load(registry, path)
    }

    /// Update access order for LRU (move to end)
    fn update_access_order(&mut self, path: &Path) {
        if let Some(pos) = self.access_order.iter().position(|p| p == path) {
            self.access_order.remove(pos);
        }
        self.access_order.push(path.to_path_buf());
    }
}

impl Default for DocumentCache {
    fn default() -> Self {
        Self::new(64)
    }
}
