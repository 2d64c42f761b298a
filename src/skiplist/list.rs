//! Skip list engine
//!
//! Unsynchronized ordered map. Nodes live in a dense arena (`Vec<Node>`) and
//! link to each other by index; the head is a bare slot vector spanning
//! `max_level` levels.

use std::fmt::{Display, Write as _};
use std::iter;

use crate::config::{Config, DEFAULT_MAX_LEVEL};
use crate::error::Result;

use super::level::LevelGenerator;
use super::node::{Node, NodeId};

/// A traversal position: either the head sentinel or a node in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cursor {
    Head,
    At(NodeId),
}

/// Probabilistic ordered map with expected O(log n) insert/search/remove
///
/// ## Layout
/// ```text
/// Level 2:  HEAD ────────────────► [3] ──────────────────► NIL
/// Level 1:  HEAD ──► [1] ────────► [3] ────────► [7] ────► NIL
/// Level 0:  HEAD ──► [1] ──► [2] ──► [3] ──► [5] ──► [7] ──► NIL
/// ```
///
/// A node drawn at level `R` is linked at levels `0..=R`. Both `R` and
/// `current_level` stay below `max_level`.
#[derive(Debug, Clone)]
pub struct SkipList<K, V> {
    /// Per-level entry points, `max_level` slots
    head: Vec<Option<NodeId>>,

    /// Every live node; the arena is the sole owner
    nodes: Vec<Node<K, V>>,

    /// Highest level with at least one node (0 when empty)
    current_level: usize,

    levels: LevelGenerator,
}

impl<K: Ord, V> SkipList<K, V> {
    /// Create an empty list. A `max_level` of 0 is treated as 1.
    pub fn new(max_level: usize) -> Self {
        Self::with_generator(LevelGenerator::new(max_level, None))
    }

    /// Create an empty list from a validated config
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_generator(LevelGenerator::new(
            config.max_level,
            config.seed,
        )))
    }

    /// Create an empty list drawing levels from `levels`
    pub fn with_generator(levels: LevelGenerator) -> Self {
        Self {
            head: vec![None; levels.max_level()],
            nodes: Vec::new(),
            current_level: 0,
            levels,
        }
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Insert or update. Returns the previous value when the key existed.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let update = self.frontier(&key);

        // Existing key: update in place, no relinking
        if let Some(id) = self.next(update[0], 0) {
            if self.nodes[id].key() == &key {
                return Some(self.nodes[id].set_value(value));
            }
        }

        // Levels above current_level already have Head in the frontier
        let level = self.levels.random_level();
        if level > self.current_level {
            tracing::debug!(from = self.current_level, to = level, "skip list grew");
            self.current_level = level;
        }

        let id = self.nodes.len();
        let mut node = Node::new(key, value, level + 1);
        for (l, slot) in node.forward.iter_mut().enumerate() {
            *slot = self.next(update[l], l);
        }
        self.nodes.push(node);

        for (l, &pred) in update.iter().enumerate().take(level + 1) {
            self.set_next(pred, l, Some(id));
        }

        None
    }

    /// Look up the value stored under `key`
    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|id| self.nodes[id].value())
    }

    /// Look up the node stored under `key`
    pub fn node(&self, key: &K) -> Option<&Node<K, V>> {
        self.find(key).map(|id| &self.nodes[id])
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Unlink and drop the node under `key`, returning its value
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let update = self.frontier(key);
        let id = self
            .next(update[0], 0)
            .filter(|&id| self.nodes[id].key() == key)?;

        for (level, &pred) in update.iter().enumerate().take(self.current_level + 1) {
            if self.next(pred, level) == Some(id) {
                let after = self.nodes[id].forward[level];
                self.set_next(pred, level, after);
            }
        }

        while self.current_level > 0 && self.head[self.current_level].is_none() {
            self.current_level -= 1;
            tracing::debug!(to = self.current_level, "skip list shrank");
        }

        let (_, value) = self.release(id).into_pair();
        Some(value)
    }

    /// Drop every node
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head.iter_mut().for_each(|slot| *slot = None);
        self.current_level = 0;
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn current_level(&self) -> usize {
        self.current_level
    }

    pub fn max_level(&self) -> usize {
        self.head.len()
    }

    /// In-order iterator over the level-0 chain
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            list: self,
            next: self.head[0],
            remaining: self.nodes.len(),
        }
    }

    /// Number of nodes linked at each level `0..=current_level`
    pub fn level_lengths(&self) -> Vec<usize> {
        (0..=self.current_level)
            .map(|level| self.chain(level).count())
            .collect()
    }

    /// One line per level, top first: `Level 1: 1:a;3:c;`
    pub fn render_levels(&self) -> String
    where
        K: Display,
        V: Display,
    {
        let mut out = String::new();
        for level in (0..=self.current_level).rev() {
            let _ = write!(out, "Level {}: ", level);
            for id in self.chain(level) {
                let node = &self.nodes[id];
                let _ = write!(out, "{}:{};", node.key(), node.value());
            }
            out.push('\n');
        }
        out
    }

    /// First node of the level-0 chain
    pub(crate) fn first_id(&self) -> Option<NodeId> {
        self.head[0]
    }

    /// The node at `id` and its level-0 successor
    pub(crate) fn step(&self, id: NodeId) -> (&Node<K, V>, Option<NodeId>) {
        let node = &self.nodes[id];
        (node, node.forward[0])
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn next(&self, at: Cursor, level: usize) -> Option<NodeId> {
        match at {
            Cursor::Head => self.head[level],
            Cursor::At(id) => self.nodes[id].forward[level],
        }
    }

    fn set_next(&mut self, at: Cursor, level: usize, target: Option<NodeId>) {
        match at {
            Cursor::Head => self.head[level] = target,
            Cursor::At(id) => self.nodes[id].forward[level] = target,
        }
    }

    /// Move right along `level` while the next key is strictly below `key`
    fn advance(&self, mut cursor: Cursor, level: usize, key: &K) -> Cursor {
        while let Some(next) = self.next(cursor, level) {
            if self.nodes[next].key() < key {
                cursor = Cursor::At(next);
            } else {
                break;
            }
        }
        cursor
    }

    /// Last position before `key` on every level (Head above current_level)
    fn frontier(&self, key: &K) -> Vec<Cursor> {
        let mut update = vec![Cursor::Head; self.head.len()];
        let mut cursor = Cursor::Head;
        for level in (0..=self.current_level).rev() {
            cursor = self.advance(cursor, level, key);
            update[level] = cursor;
        }
        update
    }

    fn find(&self, key: &K) -> Option<NodeId> {
        let mut cursor = Cursor::Head;
        for level in (0..=self.current_level).rev() {
            cursor = self.advance(cursor, level, key);
        }
        self.next(cursor, 0).filter(|&id| self.nodes[id].key() == key)
    }

    /// Remove an already unlinked node from the arena.
    ///
    /// `swap_remove` moves the last node into `id`, so links to the last node
    /// are repointed first.
    fn release(&mut self, id: NodeId) -> Node<K, V> {
        let last = self.nodes.len() - 1;
        if id != last {
            let update = self.frontier(self.nodes[last].key());
            for (level, &pred) in update.iter().enumerate().take(self.nodes[last].level()) {
                if self.next(pred, level) == Some(last) {
                    self.set_next(pred, level, Some(id));
                }
            }
        }
        self.nodes.swap_remove(id)
    }

    fn chain(&self, level: usize) -> impl Iterator<Item = NodeId> + '_ {
        iter::successors(self.head[level], move |&id| self.nodes[id].forward[level])
    }
}

impl<K: Ord, V> Default for SkipList<K, V> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LEVEL)
    }
}

impl<K: Ord, V> Extend<(K, V)> for SkipList<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, entries: I) {
        for (key, value) in entries {
            self.insert(key, value);
        }
    }
}

impl<'a, K: Ord, V> IntoIterator for &'a SkipList<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the level-0 chain, ascending by key
pub struct Iter<'a, K, V> {
    list: &'a SkipList<K, V>,
    next: Option<NodeId>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next?;
        let node = &self.list.nodes[id];
        self.next = node.forward[0];
        self.remaining -= 1;
        Some((node.key(), node.value()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
