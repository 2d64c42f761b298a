//! Snapshot Module
//!
//! Flat-file persistence for the index.
//!
//! ## Responsibilities
//! - Write every `(key, value)` pair in ascending key order
//! - Replace the previous snapshot atomically (temp file + rename)
//! - Read snapshots back, with a strict or lenient policy for bad lines
//!
//! ## File Format
//! ```text
//! ┌──────────────────────────────────────┐
//! │ <key>:<value>\n                      │
//! │ <key>:<value>\n                      │
//! │ ... one record per line, ascending   │
//! └──────────────────────────────────────┘
//! ```
//! UTF-8, no header, no record count. `:`, `\`, CR and LF inside a field are
//! backslash-escaped (see [`codec`]).

pub mod codec;
mod reader;
mod writer;

use std::path::PathBuf;

pub use reader::{SnapshotContents, SnapshotReader};
pub use writer::SnapshotWriter;

/// Outcome of a successful save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    /// Where the snapshot now lives
    pub path: PathBuf,
    /// Number of records written
    pub records: u64,
    /// Bytes written, including newlines
    pub bytes: u64,
}

/// Outcome of a successful load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Records applied through the insert path (duplicates included)
    pub records_applied: u64,
    /// Records whose key was not present before the load
    pub keys_added: u64,
    /// Malformed lines dropped (always 0 under `LoadPolicy::Strict`)
    pub lines_skipped: u64,
}
