use std::path::PathBuf;
use std::sync::Arc;

use pal_core::ParseError;
use pal_core::model::SessionRecord;
use thiserror::Error;

use crate::jsonl::JsonlRecordLog;

/// Errors surfaced by record sources.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    /// The store could not be opened at all. Callers treat this as "no data
    /// yet" rather than a failed run.
    #[error("record store unavailable at {}: {source}", .path.display())]
    StoreUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Everything read from the store in one pass, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSnapshot {
    pub records: Vec<SessionRecord>,
    /// Non-blank lines that did not parse as a record.
    pub discarded: usize,
}

impl RecordSnapshot {
    #[must_use]
    pub fn new(records: Vec<SessionRecord>) -> Self {
        Self {
            records,
            discarded: 0,
        }
    }

    /// Parses each line independently, keeping file order.
    #[must_use]
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut snapshot = Self::default();
        for line in lines {
            snapshot.push_line(line.as_ref());
        }
        snapshot
    }

    /// Parses one line and keeps it, or counts it as discarded.
    ///
    /// Blank lines are skipped without being counted.
    pub fn push_line(&mut self, line: &str) {
        match SessionRecord::parse_line(line) {
            Ok(record) => self.records.push(record),
            Err(ParseError::Blank) => {}
            Err(err) => {
                tracing::debug!(error = %err, "discarding malformed record line");
                self.discarded += 1;
            }
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }
}

/// Read-only access to the session record store.
pub trait RecordSource: Send + Sync {
    /// Reads a full snapshot of the store.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::StoreUnavailable` if the store cannot be opened.
    /// Malformed content is never an error.
    fn load(&self) -> Result<RecordSnapshot, StorageError>;
}

/// Fixed snapshot, used in tests and for records already held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordSource {
    snapshot: RecordSnapshot,
}

impl InMemoryRecordSource {
    #[must_use]
    pub fn new(records: Vec<SessionRecord>) -> Self {
        Self {
            snapshot: RecordSnapshot::new(records),
        }
    }

    #[must_use]
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            snapshot: RecordSnapshot::from_lines(lines),
        }
    }
}

impl RecordSource for InMemoryRecordSource {
    fn load(&self) -> Result<RecordSnapshot, StorageError> {
        Ok(self.snapshot.clone())
    }
}

/// Record source behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub records: Arc<dyn RecordSource>,
}

impl Storage {
    #[must_use]
    pub fn jsonl(path: impl Into<PathBuf>) -> Self {
        Self {
            records: Arc::new(JsonlRecordLog::new(path)),
        }
    }

    #[must_use]
    pub fn in_memory(records: Vec<SessionRecord>) -> Self {
        Self {
            records: Arc::new(InMemoryRecordSource::new(records)),
        }
    }
}
