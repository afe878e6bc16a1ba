//! Batch error types.

use filesync_protocol::ConfigurationError;

/// Errors that stop a batch before any file is attempted.
///
/// Per-file failures never surface here; they end up in the file's record
/// and in the [`BatchReport`](crate::BatchReport).
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}
