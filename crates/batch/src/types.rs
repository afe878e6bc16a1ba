//! Batch results.

use std::path::PathBuf;

use filesync_transfer::TransferDirection;
use serde::Serialize;

/// Outcome of one file in a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileOutcome {
    pub file_id: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Where a downloaded file was written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl FileOutcome {
    pub(crate) fn succeeded(file_id: &str, path: Option<PathBuf>) -> Self {
        Self {
            file_id: file_id.to_string(),
            success: true,
            error: None,
            path,
        }
    }

    pub(crate) fn failed(file_id: &str, error: impl Into<String>) -> Self {
        Self {
            file_id: file_id.to_string(),
            success: false,
            error: Some(error.into()),
            path: None,
        }
    }
}

/// Per-file outcomes of a batch, in input order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    pub direction: TransferDirection,
    pub outcomes: Vec<FileOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| o.success)
    }

    pub fn failed(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| !o.success)
    }

    /// True when every file succeeded (vacuously true for an empty batch).
    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(|o| o.success)
    }
}
