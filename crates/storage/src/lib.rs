#![forbid(unsafe_code)]

pub mod jsonl;
pub mod repository;

pub use jsonl::JsonlRecordLog;
pub use repository::{InMemoryRecordSource, RecordSnapshot, RecordSource, Storage, StorageError};
