//! Upload of one local file as a multipart form.

use std::sync::{Arc, Mutex};

use filesync_protocol::{
    DEFAULT_MEDIA_TYPE, ServerAddress, UPLOAD_FIELD_NAME, UPLOAD_PATH, UploadResponse,
};
use filesync_transfer::{FileDescriptor, ProgressCallback, ProgressMeter};
use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use tokio::sync::Notify;
use tokio_util::io::ReaderStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::UPLOAD_CHUNK_SIZE;
use crate::client::{ServerClient, bounded, cancellable, check_status, endpoint};
use crate::error::TransportError;

impl ServerClient {
    /// Uploads `file` to `POST /upload` under the multipart field `files`.
    ///
    /// The file is streamed from disk. `on_progress` receives the share of
    /// bytes handed to the connection, then a final 100 once the server has
    /// acknowledged the upload.
    ///
    /// Sending the body is unbounded. Once the last byte has been handed
    /// over, the server gets `response_timeout` to answer.
    pub async fn send_file(
        &self,
        file: &FileDescriptor,
        address: &ServerAddress,
        on_progress: ProgressCallback,
        cancel: &CancellationToken,
    ) -> Result<(), TransportError> {
        address.validate()?;
        let source = file
            .source
            .as_ref()
            .ok_or_else(|| TransportError::MissingSource(file.name.clone()))?;

        let handle = tokio::fs::File::open(source).await?;
        let total = handle.metadata().await?.len();
        let meter = Arc::new(Mutex::new(ProgressMeter::new(Some(total), on_progress)));
        let body_sent = Arc::new(Notify::new());
        if total == 0 {
            body_sent.notify_one();
        }

        let stream = {
            let meter = Arc::clone(&meter);
            let body_sent = Arc::clone(&body_sent);
            let mut read = 0u64;
            ReaderStream::with_capacity(handle, UPLOAD_CHUNK_SIZE).inspect(move |chunk| {
                if let Ok(bytes) = chunk {
                    read += bytes.len() as u64;
                    meter.lock().unwrap().advance(bytes.len() as u64);
                    if read >= total {
                        body_sent.notify_one();
                    }
                }
            })
        };

        let mime = file.media_type.as_deref().unwrap_or(DEFAULT_MEDIA_TYPE);
        let part = Part::stream_with_length(reqwest::Body::wrap_stream(stream), total)
            .file_name(file.name.clone())
            .mime_str(mime)?;
        let form = Form::new().part(UPLOAD_FIELD_NAME, part);

        let url = endpoint(address, UPLOAD_PATH);
        debug!(file = %file.name, size = total, %url, "upload started");

        let limit = self.options.response_timeout;
        let request = async {
            let send = self.http.post(&url).multipart(form).send();
            tokio::pin!(send);
            let resp = tokio::select! {
                resp = &mut send => resp?,
                _ = body_sent.notified() => bounded(limit, &mut send).await?,
            };
            let resp = check_status(resp).await?;
            let body = bounded(limit, resp.text()).await.unwrap_or_default();
            Ok::<_, TransportError>(body)
        };
        let body = cancellable(cancel, request).await?;

        match serde_json::from_str::<UploadResponse>(&body) {
            Ok(ack) => {
                debug!(file = %file.name, status = %ack.status, "server acknowledged upload")
            }
            Err(_) => debug!(file = %file.name, "server acknowledged upload with opaque body"),
        }

        meter.lock().unwrap().finish();
        info!(file = %file.name, bytes = total, %address, "upload complete");
        Ok(())
    }
}
