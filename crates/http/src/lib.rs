//! HTTP transport for the FileSync server.
//!
//! [`ServerClient`] moves one file per call in either direction and fetches
//! the server listing. It never touches transfer records; callers observe
//! progress through the callback they pass in.
//!
//! # Endpoints
//!
//! - `GET /files`: JSON listing
//! - `POST /upload`: multipart, field `files`
//! - `GET /download/{name}`: raw bytes
//! - `DELETE /delete/{name}`

pub mod client;
pub mod download;
pub mod error;
pub mod listing;
pub mod media;
pub mod upload;

#[cfg(test)]
mod test_server;

pub use client::{ClientOptions, ProbeOutcome, ServerClient};
pub use download::list_downloaded;
pub use error::{MediaError, TransportError};
pub use media::{AlbumRegistrar, DEFAULT_ALBUM, MediaRegistrar, NoMediaRegistrar};

use std::time::Duration;

/// Timeout for establishing the TCP connection.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// How long the server may stay silent: waiting for response headers, for
/// the next download chunk, or for the reply once an upload body is sent.
/// It never bounds the total transfer time.
pub const RESPONSE_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for the connectivity probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Read size when streaming a local file into an upload body (64 KB).
pub const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;
