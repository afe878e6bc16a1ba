//! Transfer orchestration for FileSync.
//!
//! Runs a batch of uploads or downloads one file at a time and keeps a
//! shared [`TransferStore`](filesync_transfer::TransferStore) current. The
//! crate does no I/O of its own: it drives a [`FileTransport`], which the
//! HTTP client implements and tests replace with doubles.

pub mod error;
pub mod orchestrator;
pub mod transport;
pub mod types;

pub use error::BatchError;
pub use orchestrator::TransferOrchestrator;
pub use transport::FileTransport;
pub use types::{BatchReport, FileOutcome};
