//! Transport seam between the orchestrator and the network.

use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;

use filesync_http::{ServerClient, TransportError};
use filesync_protocol::ServerAddress;
use filesync_transfer::{FileDescriptor, ProgressCallback};
use tokio_util::sync::CancellationToken;

/// Moves one file to or from a server.
///
/// [`ServerClient`] is the production implementation. Keeping the
/// orchestrator behind this trait lets it be tested without a server.
pub trait FileTransport: Send + Sync {
    /// Uploads `file`, reporting progress percentages to `on_progress`.
    fn send_file<'a>(
        &'a self,
        file: &'a FileDescriptor,
        address: &'a ServerAddress,
        on_progress: ProgressCallback,
        cancel: &'a CancellationToken,
    ) -> Pin<Box<dyn Future<Output = Result<(), TransportError>> + Send + 'a>>;

    /// Downloads `file` and returns the local path it was written to.
    fn fetch_file<'a>(
        &'a self,
        file: &'a FileDescriptor,
        address: &'a ServerAddress,
        on_progress: ProgressCallback,
        cancel: &'a CancellationToken,
    ) -> Pin<Box<dyn Future<Output = Result<PathBuf, TransportError>> + Send + 'a>>;
}

impl FileTransport for ServerClient {
    fn send_file<'a>(
        &'a self,
        file: &'a FileDescriptor,
        address: &'a ServerAddress,
        on_progress: ProgressCallback,
        cancel: &'a CancellationToken,
    ) -> Pin<Box<dyn Future<Output = Result<(), TransportError>> + Send + 'a>> {
        Box::pin(ServerClient::send_file(self, file, address, on_progress, cancel))
    }

    fn fetch_file<'a>(
        &'a self,
        file: &'a FileDescriptor,
        address: &'a ServerAddress,
        on_progress: ProgressCallback,
        cancel: &'a CancellationToken,
    ) -> Pin<Box<dyn Future<Output = Result<PathBuf, TransportError>> + Send + 'a>> {
        Box::pin(ServerClient::fetch_file(self, file, address, on_progress, cancel))
    }
}
