//! Snapshot Reader
//!
//! Reads a snapshot file line by line and decodes it according to the
//! configured [`LoadPolicy`].

use std::fmt::Display;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::config::LoadPolicy;
use crate::error::{Result, SkipKvError};

use super::codec::decode_record;

/// Decoded contents of a snapshot, not yet applied to an index
#[derive(Debug)]
pub struct SnapshotContents<K, V> {
    /// Records in file order (duplicates preserved)
    pub records: Vec<(K, V)>,
    /// Lines dropped under `LoadPolicy::Lenient`
    pub lines_skipped: u64,
}

/// Reads records from a snapshot file
pub struct SnapshotReader {
    path: PathBuf,
    reader: BufReader<File>,
    policy: LoadPolicy,
}

impl SnapshotReader {
    /// Open a snapshot file for reading
    pub fn open(path: &Path, policy: LoadPolicy) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            reader: BufReader::new(file),
            policy,
        })
    }

    /// Read and decode every line.
    ///
    /// Under `Strict` the first bad line aborts with `SkipKvError::Parse`.
    /// Under `Lenient` bad lines are logged and counted. I/O errors always
    /// abort.
    pub fn read_all<K, V>(mut self) -> Result<SnapshotContents<K, V>>
    where
        K: FromStr,
        K::Err: Display,
        V: FromStr,
        V::Err: Display,
    {
        let mut records = Vec::new();
        let mut lines_skipped = 0;
        let mut buf = Vec::new();
        let mut line_no = 0;

        loop {
            buf.clear();
            if self.reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_no += 1;

            let decoded = decode_line(line_no, &buf);
            match decoded {
                Ok(None) => {}
                Ok(Some(record)) => records.push(record),
                Err(e) => match self.policy {
                    LoadPolicy::Strict => return Err(e),
                    LoadPolicy::Lenient => {
                        tracing::warn!(path = %self.path.display(), error = %e, "skipping snapshot line");
                        lines_skipped += 1;
                    }
                },
            }
        }

        Ok(SnapshotContents {
            records,
            lines_skipped,
        })
    }
}

/// Decode one raw line. Blank lines yield `Ok(None)`.
fn decode_line<K, V>(line_no: usize, raw: &[u8]) -> Result<Option<(K, V)>>
where
    K: FromStr,
    K::Err: Display,
    V: FromStr,
    V::Err: Display,
{
    let text = std::str::from_utf8(raw)
        .map_err(|e| SkipKvError::parse(line_no, format!("invalid UTF-8: {}", e)))?;

    // Strip the terminator; CR is always escaped by the writer, so a raw one is CRLF
    let text = text.strip_suffix('\n').unwrap_or(text);
    let text = text.strip_suffix('\r').unwrap_or(text);

    if text.is_empty() {
        return Ok(None);
    }
    decode_record(line_no, text).map(Some)
}
