use thiserror::Error;

/// Why a single record-log line could not become a `SessionRecord`.
///
/// Malformed lines are expected in an append-only log (a failed POST writes
/// `null`, a concurrent append can leave a half-written tail), so callers
/// normally discard this value and keep reading.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    #[error("line is blank")]
    Blank,

    #[error("line is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("line is valid JSON but not an object (found {found})")]
    NotAnObject { found: &'static str },
}
