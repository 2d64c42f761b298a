//! # SkipKV
//!
//! An in-memory ordered key-value index with:
//! - A skip list core (expected O(log n) insert/search/delete)
//! - One coarse lock, safe to share across threads
//! - Flat-file snapshots with atomic replacement
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      SkipListIndex                          │
//! │          (Mutex: one operation at a time)                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  SkipList   │          │  Snapshot   │
//!   │  (arena)    │          │ (key:value) │
//!   └─────────────┘          └─────────────┘
//! ```
//!
//! ## Example
//! ```
//! use skipkv::SkipListIndex;
//!
//! let index: SkipListIndex<u32, String> = SkipListIndex::new();
//! index.insert(3, "c".to_string());
//! index.insert(1, "a".to_string());
//!
//! assert_eq!(index.search(&1), Some("a".to_string()));
//! assert!(index.delete(&3));
//! assert_eq!(index.size(), 1);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod skiplist;
pub mod snapshot;
pub mod index;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{SkipKvError, Result};
pub use config::{Config, LoadPolicy};
pub use index::SkipListIndex;
pub use snapshot::{LoadReport, SaveReport};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of SkipKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
