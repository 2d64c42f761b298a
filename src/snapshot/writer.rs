//! Snapshot Writer
//!
//! Writes records to a temporary file next to the target, then renames it
//! over the target. A failed save leaves any previous snapshot intact.

use std::fmt::Display;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::Result;

use super::codec::encode_record;
use super::SaveReport;

/// Builder-style writer for a single snapshot file
pub struct SnapshotWriter {
    /// Final snapshot location
    path: PathBuf,
    /// Buffered temp file in the same directory as `path`
    writer: BufWriter<NamedTempFile>,
    /// Reused per-record encode buffer
    line: String,
    records: u64,
    bytes: u64,
}

impl SnapshotWriter {
    /// Start a snapshot at `path`, creating the parent directory if needed
    pub fn create(path: &Path) -> Result<Self> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let temp = NamedTempFile::new_in(&dir)?;

        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(temp),
            line: String::new(),
            records: 0,
            bytes: 0,
        })
    }

    /// Append one record (callers supply records in key order)
    pub fn append<K: Display, V: Display>(&mut self, key: &K, value: &V) -> Result<()> {
        self.line.clear();
        encode_record(&mut self.line, key, value);
        self.writer.write_all(self.line.as_bytes())?;

        self.records += 1;
        self.bytes += self.line.len() as u64;
        Ok(())
    }

    /// Flush, fsync and atomically move the temp file into place
    pub fn finish(self) -> Result<SaveReport> {
        let temp = self.writer.into_inner().map_err(|e| e.into_error())?;
        temp.as_file().sync_all()?;
        temp.persist(&self.path).map_err(|e| e.error)?;

        Ok(SaveReport {
            path: self.path,
            records: self.records,
            bytes: self.bytes,
        })
    }
}
