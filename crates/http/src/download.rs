//! Download of one remote file into the client's download directory.

use std::path::{Path, PathBuf};

use filesync_protocol::{DOWNLOAD_PATH, ServerAddress};
use filesync_transfer::{FileDescriptor, ProgressCallback, ProgressMeter, validate_file_name};
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::client::{ServerClient, bounded, cancellable, check_status, encode_segment, endpoint};
use crate::error::TransportError;

/// Suffix of a download still being written.
const PARTIAL_SUFFIX: &str = ".part";

impl ServerClient {
    /// Downloads `file` from `GET /download/{name}` and returns where it was
    /// stored.
    ///
    /// Bytes go to `<name>.part` first and replace `<name>` only once the
    /// body is complete, so a failed download never clobbers an earlier copy.
    /// Without a usable `Content-Length` progress stays at 0 until the file
    /// is complete.
    pub async fn fetch_file(
        &self,
        file: &FileDescriptor,
        address: &ServerAddress,
        on_progress: ProgressCallback,
        cancel: &CancellationToken,
    ) -> Result<PathBuf, TransportError> {
        address.validate()?;
        validate_file_name(&file.name)
            .map_err(|_| TransportError::InvalidName(file.name.clone()))?;

        let url = format!(
            "{}/{}",
            endpoint(address, DOWNLOAD_PATH),
            encode_segment(&file.name)
        );
        let dir = &self.options.download_dir;
        let target = dir.join(&file.name);
        let partial = dir.join(format!("{}{PARTIAL_SUFFIX}", file.name));

        debug!(file = %file.name, %url, "download started");
        let result = cancellable(cancel, async {
            let meter = self.stream_to(&url, dir, &partial, on_progress).await?;
            tokio::fs::rename(&partial, &target).await?;
            Ok::<_, TransportError>(meter)
        })
        .await;

        let mut meter = match result {
            Ok(meter) => meter,
            Err(e) => {
                if let Err(rm) = tokio::fs::remove_file(&partial).await {
                    if rm.kind() != std::io::ErrorKind::NotFound {
                        warn!(
                            path = %partial.display(),
                            error = %rm,
                            "failed to remove partial download"
                        );
                    }
                }
                return Err(e);
            }
        };
        meter.finish();

        if let Err(e) = self.media.register(&target).await {
            warn!(file = %file.name, error = %e, "could not add download to media collection");
        }

        info!(
            file = %file.name,
            bytes = meter.bytes_done(),
            path = %target.display(),
            "download complete"
        );
        Ok(target)
    }

    async fn stream_to(
        &self,
        url: &str,
        dir: &Path,
        partial: &Path,
        on_progress: ProgressCallback,
    ) -> Result<ProgressMeter, TransportError> {
        let resp = bounded(self.options.response_timeout, self.http.get(url).send()).await?;
        let mut resp = check_status(resp).await?;

        let total = resp.content_length();
        let mut meter = ProgressMeter::new(total, on_progress);

        tokio::fs::create_dir_all(dir).await?;
        let mut out = BufWriter::new(tokio::fs::File::create(partial).await?);
        // Idle limit per chunk; the whole body may take as long as it needs.
        while let Some(chunk) = bounded(self.options.response_timeout, resp.chunk()).await? {
            out.write_all(&chunk).await?;
            meter.advance(chunk.len() as u64);
        }
        out.flush().await?;

        if let Some(expected) = total {
            if meter.bytes_done() != expected {
                return Err(TransportError::Contract(format!(
                    "expected {expected} bytes, received {}",
                    meter.bytes_done()
                )));
            }
        }
        Ok(meter)
    }
}

/// Files already present in the download directory `dir`, sorted by name.
///
/// A missing directory yields an empty list. Partial downloads are skipped.
pub async fn list_downloaded(dir: &Path) -> Result<Vec<FileDescriptor>, TransportError> {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let metadata = entry.metadata().await?;
        if !metadata.is_file() {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            continue;
        };
        if name.ends_with(PARTIAL_SUFFIX) {
            continue;
        }

        let mut descriptor = FileDescriptor::remote(name, metadata.len());
        descriptor.source = Some(entry.path());
        files.push(descriptor);
    }

    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}
