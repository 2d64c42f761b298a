//! Skip List Module
//!
//! Single-threaded ordered map used as the index's storage.
//!
//! ## Responsibilities
//! - Ordered insert / point lookup / removal in expected O(log n)
//! - Level promotion with a fair coin, bounded by `max_level`
//! - In-order iteration over the level-0 chain
//!
//! ## Ownership
//! Nodes are held in a dense arena and addressed by index. Every link, at
//! every level, is a plain index; only the arena owns nodes, so teardown is a
//! flat `Vec` drop with no recursion through the chain. Removal
//! `swap_remove`s the node and repoints the links to the node that moved, so
//! indices are not stable and never leave the crate.
//!
//! Synchronization lives one layer up in [`crate::index::SkipListIndex`].

mod level;
mod list;
mod node;

pub use level::LevelGenerator;
pub use list::{Iter, SkipList};
pub use node::Node;
pub(crate) use node::NodeId;
