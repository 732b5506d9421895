//! Newline-delimited JSON record log.
//!
//! The log is append-only and written by a separate ingestion process, so a
//! read may observe a half-written final line. Lines are decoded one at a
//! time; anything that is not a complete record is counted and dropped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::repository::{RecordSnapshot, RecordSource, StorageError};

/// JSONL file-backed record store.
#[derive(Debug, Clone)]
pub struct JsonlRecordLog {
    path: PathBuf,
}

impl JsonlRecordLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every line from `reader` into a snapshot.
    ///
    /// A line that is not UTF-8 is discarded. A read error mid-stream ends the
    /// snapshot with what was parsed so far.
    pub fn read_from(reader: impl BufRead) -> RecordSnapshot {
        let mut snapshot = RecordSnapshot::default();
        for chunk in reader.split(b'\n') {
            let bytes = match chunk {
                Ok(bytes) => bytes,
                Err(err) => {
                    tracing::warn!(error = %err, "record log read interrupted");
                    break;
                }
            };
            match std::str::from_utf8(&bytes) {
                Ok(line) => snapshot.push_line(line),
                Err(_) => {
                    tracing::debug!("discarding non-UTF-8 record line");
                    snapshot.discarded += 1;
                }
            }
        }
        snapshot
    }
}

impl RecordSource for JsonlRecordLog {
    fn load(&self) -> Result<RecordSnapshot, StorageError> {
        let file = File::open(&self.path).map_err(|source| StorageError::StoreUnavailable {
            path: self.path.clone(),
            source,
        })?;

        let snapshot = Self::read_from(BufReader::new(file));
        tracing::debug!(
            path = %self.path.display(),
            records = snapshot.len(),
            discarded = snapshot.discarded,
            "loaded record log"
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn missing_file_is_store_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let log = JsonlRecordLog::new(dir.path().join("absent.jsonl"));

        let err = log.load().unwrap_err();

        assert!(matches!(err, StorageError::StoreUnavailable { .. }));
    }

    #[test]
    fn invalid_utf8_line_is_discarded() {
        let mut bytes = b"{\"variant\":\"baseline\"}\n".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, b'\n']);
        bytes.extend_from_slice(b"{\"variant\":\"enhanced\"}\n");

        let snapshot = JsonlRecordLog::read_from(Cursor::new(bytes));

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.discarded, 1);
    }

    #[test]
    fn crlf_line_endings_are_accepted() {
        let bytes = b"{\"variant\":\"baseline\"}\r\n\r\n{\"variant\":\"enhanced\"}\r\n";

        let snapshot = JsonlRecordLog::read_from(Cursor::new(&bytes[..]));

        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.discarded, 0);
    }
}
