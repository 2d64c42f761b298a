//! Index Module
//!
//! The thread-safe skip list index.
//!
//! ## Responsibilities
//! - Serialize every operation behind one lock
//! - Insert / search / delete / enumerate over the skip list
//! - Save and load flat-file snapshots

use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

use parking_lot::{Mutex, MutexGuard};

use crate::config::Config;
use crate::error::Result;
use crate::skiplist::{NodeId, SkipList};
use crate::snapshot::{LoadReport, SaveReport, SnapshotReader, SnapshotWriter};

/// An ordered key-value index safe to share across threads
///
/// ## Concurrency Model: One Coarse Lock
///
/// - Every operation (reads included) takes `state` for its full duration
/// - A splice touches several levels at once, so readers never observe a
///   half-linked node
/// - `save`/`load` hold the lock across their file I/O, so they serialize
///   with everything else for as long as the file takes
/// - `parking_lot::Mutex` does not poison; a panicking caller cannot wedge
///   the index
pub struct SkipListIndex<K, V> {
    /// Index configuration
    config: Config,

    /// The skip list and everything reachable from it
    state: Mutex<SkipList<K, V>>,
}

impl<K: Ord, V: Clone> SkipListIndex<K, V> {
    /// Create an empty index with the default configuration
    pub fn new() -> Self {
        let config = Config::default();
        let list = SkipList::new(config.max_level);
        Self {
            config,
            state: Mutex::new(list),
        }
    }

    /// Create an empty index with a custom height bound
    pub fn with_max_level(max_level: usize) -> Result<Self> {
        Self::with_config(Config::builder().max_level(max_level).build())
    }

    /// Create an empty index from a config (does not touch the snapshot file)
    pub fn with_config(config: Config) -> Result<Self> {
        let list = SkipList::from_config(&config)?;
        Ok(Self {
            config,
            state: Mutex::new(list),
        })
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Insert a pair. An existing key has its value replaced in place and
    /// the previous value is returned.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        let mut list = self.state.lock();
        let previous = list.insert(key, value);
        tracing::trace!(updated = previous.is_some(), size = list.len(), "insert");
        previous
    }

    /// Look up a key. Absent keys are `None`, never an error.
    pub fn search(&self, key: &K) -> Option<V> {
        self.state.lock().get(key).cloned()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.state.lock().contains_key(key)
    }

    /// Remove a key. Returns `false` (and changes nothing) if it was absent.
    pub fn delete(&self, key: &K) -> bool {
        let mut list = self.state.lock();
        let removed = list.remove(key).is_some();
        tracing::trace!(removed, size = list.len(), "delete");
        removed
    }

    /// Copy of every pair in ascending key order
    pub fn entries(&self) -> Vec<(K, V)>
    where
        K: Clone,
    {
        self.state
            .lock()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Lazy ascending iterator. Each call starts again from the head.
    ///
    /// The iterator holds the index lock until dropped; calling any other
    /// index method on the same thread meanwhile will deadlock.
    pub fn iter(&self) -> Entries<'_, K, V>
    where
        K: Clone,
    {
        let list = self.state.lock();
        let next = list.first_id();
        Entries { list, next }
    }

    /// Number of distinct keys, O(1)
    pub fn size(&self) -> usize {
        self.state.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().is_empty()
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.state.lock().clear();
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Highest occupied level (0 when empty)
    pub fn current_level(&self) -> usize {
        self.state.lock().current_level()
    }

    pub fn max_level(&self) -> usize {
        self.state.lock().max_level()
    }

    /// Nodes linked at each level, bottom first
    pub fn level_lengths(&self) -> Vec<usize> {
        self.state.lock().level_lengths()
    }

    /// Human-readable dump of every level, top first
    pub fn display_levels(&self) -> String
    where
        K: Display,
        V: Display,
    {
        self.state.lock().render_levels()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

// =============================================================================
// Persistence
// =============================================================================

impl<K, V> SkipListIndex<K, V>
where
    K: Ord + Display + FromStr,
    K::Err: Display,
    V: Clone + Display + FromStr,
    V::Err: Display,
{
    /// Create an index and, if `config.snapshot_path` exists, load it
    pub fn open(config: Config) -> Result<Self> {
        let index = Self::with_config(config)?;
        if index.config.snapshot_path.exists() {
            index.restore()?;
        } else {
            tracing::debug!(path = %index.config.snapshot_path.display(), "no snapshot to restore");
        }
        Ok(index)
    }

    /// Write every pair to `path` in ascending order
    ///
    /// The file is replaced atomically; on error the previous file (if any)
    /// is left as it was and the index is never modified.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<SaveReport> {
        let path = path.as_ref();
        let list = self.state.lock();

        let mut writer = SnapshotWriter::create(path)?;
        for (key, value) in list.iter() {
            writer.append(key, value)?;
        }
        let report = writer.finish()?;
        drop(list);

        tracing::info!(
            path = %report.path.display(),
            records = report.records,
            bytes = report.bytes,
            "snapshot saved"
        );
        Ok(report)
    }

    /// Merge the pairs in `path` into the index through the insert path
    ///
    /// Duplicate keys resolve last-write-wins. The whole file is decoded
    /// before anything is applied, so a strict-mode parse error or an I/O
    /// error leaves the index unchanged.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<LoadReport> {
        let path = path.as_ref();
        let mut list = self.state.lock();

        let contents = SnapshotReader::open(path, self.config.load_policy)?.read_all::<K, V>()?;

        let mut report = LoadReport {
            lines_skipped: contents.lines_skipped,
            ..LoadReport::default()
        };
        for (key, value) in contents.records {
            if list.insert(key, value).is_none() {
                report.keys_added += 1;
            }
            report.records_applied += 1;
        }
        let size = list.len();
        drop(list);

        tracing::info!(
            path = %path.display(),
            applied = report.records_applied,
            skipped = report.lines_skipped,
            size,
            "snapshot loaded"
        );
        Ok(report)
    }

    /// Save to the configured snapshot path
    pub fn persist(&self) -> Result<SaveReport> {
        self.save(&self.config.snapshot_path)
    }

    /// Load from the configured snapshot path
    pub fn restore(&self) -> Result<LoadReport> {
        self.load(&self.config.snapshot_path)
    }
}

impl<K: Ord, V: Clone> Default for SkipListIndex<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Lazy in-order iterator returned by [`SkipListIndex::iter`]
pub struct Entries<'a, K, V> {
    list: MutexGuard<'a, SkipList<K, V>>,
    next: Option<NodeId>,
}

impl<K: Ord + Clone, V: Clone> Iterator for Entries<'_, K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let (node, next) = self.list.step(id);
        let item = (node.key().clone(), node.value().clone());
        self.next = next;
        Some(item)
    }
}
