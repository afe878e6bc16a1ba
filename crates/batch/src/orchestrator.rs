//! Sequential transfer orchestrator.
//!
//! Runs one batch of uploads or downloads against a single server and
//! records each file's progress and outcome in the shared store.

use std::sync::Arc;

use filesync_protocol::ServerAddress;
use filesync_transfer::{
    FileDescriptor, ProgressCallback, TransferDirection, TransferStatus, TransferStore,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::error::BatchError;
use crate::transport::FileTransport;
use crate::types::{BatchReport, FileOutcome};

/// Error recorded for files left unattempted by a cancelled batch.
const CANCELLED: &str = "cancelled";

/// Drives batches through a [`FileTransport`] and keeps a [`TransferStore`]
/// current.
pub struct TransferOrchestrator {
    store: Arc<TransferStore>,
    transport: Arc<dyn FileTransport>,
    cancel: CancellationToken,
}

impl TransferOrchestrator {
    pub fn new(store: Arc<TransferStore>, transport: Arc<dyn FileTransport>) -> Self {
        Self {
            store,
            transport,
            cancel: CancellationToken::new(),
        }
    }

    /// Returns a cancellation token for running batches.
    ///
    /// Cancelling aborts the file in flight and marks every remaining file
    /// as failed with `cancelled`. The token stays cancelled.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Transfers `files` in order, one at a time.
    ///
    /// A failing file does not stop the batch. When this returns, every file
    /// in `files` has a terminal record in the store. Only an invalid
    /// `address` fails the batch as a whole, before the store is touched.
    pub async fn run_batch(
        &self,
        files: &[FileDescriptor],
        direction: TransferDirection,
        address: &ServerAddress,
    ) -> Result<BatchReport, BatchError> {
        address.validate()?;
        info!(%direction, %address, files = files.len(), "batch started");

        let mut outcomes = Vec::with_capacity(files.len());
        for file in files {
            let outcome = if self.cancel.is_cancelled() {
                self.store.set_status(&file.name, TransferStatus::Error(CANCELLED.into()));
                debug!(file = %file.name, "skipped, batch cancelled");
                FileOutcome::failed(&file.name, CANCELLED)
            } else {
                self.transfer_one(file, direction, address).await
            };
            outcomes.push(outcome);
        }

        let report = BatchReport {
            direction,
            outcomes,
        };
        info!(
            %direction,
            succeeded = report.succeeded().count(),
            failed = report.failed().count(),
            "batch finished"
        );
        Ok(report)
    }

    async fn transfer_one(
        &self,
        file: &FileDescriptor,
        direction: TransferDirection,
        address: &ServerAddress,
    ) -> FileOutcome {
        let name = file.name.as_str();
        self.store.set_status(name, TransferStatus::InProgress(direction));

        let on_progress: ProgressCallback = {
            let store = Arc::clone(&self.store);
            let file_id = file.name.clone();
            Arc::new(move |pct| store.set_progress(&file_id, pct))
        };

        let result = match direction {
            TransferDirection::Upload => self
                .transport
                .send_file(file, address, on_progress, &self.cancel)
                .await
                .map(|()| None),
            TransferDirection::Download => self
                .transport
                .fetch_file(file, address, on_progress, &self.cancel)
                .await
                .map(Some),
        };

        match result {
            Ok(path) => {
                self.store.set_status(name, TransferStatus::Success);
                info!(file = name, %direction, "transfer succeeded");
                FileOutcome::succeeded(name, path)
            }
            Err(e) => {
                let message = e.to_string();
                self.store.set_status(name, TransferStatus::Error(message.clone()));
                error!(file = name, %direction, error = %message, "transfer failed");
                FileOutcome::failed(name, message)
            }
        }
    }
}
