//! Shared error types for the services crate.

use std::path::PathBuf;

use thiserror::Error;

/// Errors emitted while writing a report artifact.
///
/// Every input-side condition (missing store, malformed lines, no adaptive
/// data) has a safe default and never reaches this type.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReportError {
    #[error("failed to write report to {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}
