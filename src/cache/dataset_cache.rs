//! Memoized dataset loads.
//!
//! Loading and enriching a source is a pure function of the source and its
//! delimiter, so results can be shared. Entries are handed out as `Arc`s and
//! never mutated after insertion.

use crate::error::Result;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Identity of a load: the canonical source path and the delimiter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceKey {
    pub path: PathBuf,
    pub delimiter: char,
}

impl SourceKey {
    /// Paths that cannot be canonicalized (e.g. missing files) are kept as
    /// given; the load itself will report the failure.
    pub fn new(path: &Path, delimiter: char) -> Self {
        let path = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        Self { path, delimiter }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

pub struct DatasetCache<T> {
    entries: Mutex<HashMap<SourceKey, Arc<T>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<T> DatasetCache<T> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Return the cached value for `key`, or run `load` and cache its result.
    /// Failed loads are not cached.
    pub fn get_or_load<F>(&self, key: SourceKey, load: F) -> Result<Arc<T>>
    where
        F: FnOnce() -> Result<T>,
    {
        // Held across the load so concurrent callers for the same source wait
        // instead of loading twice.
        let mut entries = self.lock();
        if let Some(value) = entries.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!("Cache hit for {}", key.path.display());
            return Ok(Arc::clone(value));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!("Cache miss for {}", key.path.display());
        let value = Arc::new(load()?);
        entries.insert(key, Arc::clone(&value));
        Ok(value)
    }

    pub fn contains(&self, key: &SourceKey) -> bool {
        self.lock().contains_key(key)
    }

    pub fn invalidate(&self, key: &SourceKey) -> bool {
        self.lock().remove(key).is_some()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.lock().len(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SourceKey, Arc<T>>> {
        // A panic inside `load` poisons the lock but leaves the map consistent
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<T> Default for DatasetCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
