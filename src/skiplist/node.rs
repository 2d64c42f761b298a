//! Skip list node
//!
//! A key, a value and one forward link per level the node participates in.

/// Current position of a node inside the list's arena.
///
/// Not stable: removing a node moves the last node into the freed slot.
pub(crate) type NodeId = usize;

/// A single entry in the skip list
///
/// Forward links are plain arena indices. The arena owns every node, so
/// dropping a node never reaches into the nodes it links to.
#[derive(Debug, Clone)]
pub struct Node<K, V> {
    /// Immutable after construction; determines the node's position
    key: K,

    /// Mutable in place on update-on-existing-key
    value: V,

    /// `forward[l]` is the next node at level `l`
    pub(super) forward: Vec<Option<NodeId>>,
}

impl<K, V> Node<K, V> {
    /// Create an unlinked node with `level` link slots (at least one)
    pub fn new(key: K, value: V, level: usize) -> Self {
        debug_assert!(level >= 1, "a node needs at least one link slot");
        Self {
            key,
            value,
            forward: vec![None; level.max(1)],
        }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    /// Replace the value, returning the old one. Ordering and links are untouched.
    pub fn set_value(&mut self, value: V) -> V {
        std::mem::replace(&mut self.value, value)
    }

    /// Number of levels this node is linked at
    pub fn level(&self) -> usize {
        self.forward.len()
    }

    pub(super) fn into_pair(self) -> (K, V) {
        (self.key, self.value)
    }
}
