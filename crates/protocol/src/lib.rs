//! Wire protocol of the FileSync server.
//!
//! The server is a plain HTTP service. This crate only describes what the
//! client sends and expects back; it performs no I/O.

pub mod address;
pub mod constants;
pub mod types;

// Re-export primary types for convenience.
pub use address::{ConfigurationError, ServerAddress};
pub use constants::{
    DEFAULT_MEDIA_TYPE, DEFAULT_PORT, DELETE_PATH, DOWNLOAD_PATH, FILES_PATH, UPLOAD_FIELD_NAME,
    UPLOAD_PATH,
};
pub use types::{DeleteResponse, RemoteFileEntry, UploadResponse};
