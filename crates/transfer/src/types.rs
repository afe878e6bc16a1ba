use std::fmt;
use std::path::{Path, PathBuf};

use filesync_protocol::RemoteFileEntry;
use serde::{Deserialize, Serialize};

use crate::TransferError;

/// Direction of a transfer batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferDirection {
    Upload,
    Download,
}

impl fmt::Display for TransferDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upload => f.write_str("upload"),
            Self::Download => f.write_str("download"),
        }
    }
}

/// Status of one file's transfer attempt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "state", content = "detail")]
pub enum TransferStatus {
    #[default]
    Idle,
    InProgress(TransferDirection),
    Success,
    Error(String),
}

impl TransferStatus {
    /// Returns `true` for `Success` and `Error`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Error(_))
    }
}

/// A file known to the client, either picked locally or listed by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileDescriptor {
    /// Display name and transfer key.
    pub name: String,
    pub size: u64,
    /// Local file to read for upload. `None` for remote-only entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default)]
    pub selected: bool,
}

impl FileDescriptor {
    /// Describes a local file, reading its size from the filesystem.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TransferError> {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path)?;
        if !metadata.is_file() {
            return Err(TransferError::InvalidName(format!(
                "not a regular file: {}",
                path.display()
            )));
        }

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| TransferError::InvalidName(path.display().to_string()))?
            .to_string();

        Ok(Self {
            name,
            size: metadata.len(),
            source: Some(path.to_path_buf()),
            media_type: None,
            selected: true,
        })
    }

    /// Describes a file that exists only on the server.
    pub fn remote(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
            source: None,
            media_type: None,
            selected: false,
        }
    }

    /// Sets the content-type hint.
    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }
}

impl From<RemoteFileEntry> for FileDescriptor {
    fn from(entry: RemoteFileEntry) -> Self {
        Self::remote(entry.name, entry.size)
    }
}

/// Status and progress of one file, keyed by the file's name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRecord {
    pub file_id: String,
    /// Percentage in `[0, 100]`.
    pub progress: f64,
    pub status: TransferStatus,
}

impl TransferRecord {
    pub(crate) fn new(file_id: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
            progress: 0.0,
            status: TransferStatus::Idle,
        }
    }

    /// Error message of a failed attempt.
    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            TransferStatus::Error(msg) => Some(msg),
            _ => None,
        }
    }
}
