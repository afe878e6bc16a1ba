//! Transfer records, progress tracking and file selection.
//!
//! Everything here is synchronous. The [`TransferStore`] is the single
//! shared mutable state of a FileSync client: the orchestrator writes to it,
//! the interface layer subscribes to it.

mod format;
mod progress;
mod selection;
mod store;
mod types;
mod validation;

pub use format::format_file_size;
pub use progress::{ProgressCallback, ProgressMeter, percent};
pub use selection::FileSelection;
pub use store::{StoreEvent, SubscriptionId, TransferStore};
pub use types::{FileDescriptor, TransferDirection, TransferRecord, TransferStatus};
pub use validation::validate_file_name;

/// Errors produced by the transfer crate.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid file name: {0}")]
    InvalidName(String),
}
