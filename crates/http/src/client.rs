//! FileSync server client.
//!
//! Async HTTP client using `reqwest`. One instance is shared for every
//! operation against every server address.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use filesync_protocol::{DELETE_PATH, DeleteResponse, FILES_PATH, ServerAddress};
use filesync_transfer::validate_file_name;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::header::ACCEPT;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::TransportError;
use crate::media::{MediaRegistrar, NoMediaRegistrar};
use crate::{CONNECT_TIMEOUT, PROBE_TIMEOUT, RESPONSE_TIMEOUT};

/// Characters kept verbatim in a path segment, as `encodeURIComponent` does.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'!')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Tunables of a [`ServerClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Bound on establishing the TCP connection.
    pub connect_timeout: Duration,
    /// Bound on each wait for the server: response headers, the next
    /// download chunk, or the reply after an upload body.
    pub response_timeout: Duration,
    /// Where downloaded files are written.
    pub download_dir: PathBuf,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            connect_timeout: CONNECT_TIMEOUT,
            response_timeout: RESPONSE_TIMEOUT,
            download_dir: std::env::temp_dir().join("filesync"),
        }
    }
}

/// Result of a connectivity probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The listing endpoint answered with a success status.
    Reachable,
    /// The server answered, but not with success; transfers may fail.
    UnexpectedStatus(u16),
}

/// HTTP client for a FileSync server.
pub struct ServerClient {
    pub(crate) http: reqwest::Client,
    pub(crate) options: ClientOptions,
    pub(crate) media: Arc<dyn MediaRegistrar>,
}

impl ServerClient {
    /// Creates a client with the given options and no media registration.
    pub fn new(options: ClientOptions) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .connect_timeout(options.connect_timeout)
            .user_agent(concat!("filesync/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            options,
            media: Arc::new(NoMediaRegistrar),
        })
    }

    /// Registers every completed download with `registrar`.
    pub fn with_media_registrar(mut self, registrar: Arc<dyn MediaRegistrar>) -> Self {
        self.media = registrar;
        self
    }

    /// Directory downloads are written to.
    pub fn download_dir(&self) -> &Path {
        &self.options.download_dir
    }

    /// Checks that the server answers on its listing endpoint.
    pub async fn probe(&self, address: &ServerAddress) -> Result<ProbeOutcome, TransportError> {
        address.validate()?;
        let url = endpoint(address, FILES_PATH);

        let resp = self
            .http
            .get(&url)
            .header(ACCEPT, "application/json")
            .timeout(PROBE_TIMEOUT)
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            debug!(%address, "server reachable");
            Ok(ProbeOutcome::Reachable)
        } else {
            debug!(%address, status = status.as_u16(), "server answered with non-success status");
            Ok(ProbeOutcome::UnexpectedStatus(status.as_u16()))
        }
    }

    /// Deletes `name` on the server.
    pub async fn delete_file(
        &self,
        name: &str,
        address: &ServerAddress,
    ) -> Result<DeleteResponse, TransportError> {
        address.validate()?;
        validate_file_name(name).map_err(|_| TransportError::InvalidName(name.to_string()))?;

        let url = format!("{}/{}", endpoint(address, DELETE_PATH), encode_segment(name));
        let resp = self
            .http
            .delete(&url)
            .timeout(self.options.response_timeout)
            .send()
            .await?;
        let resp = check_status(resp).await?;

        let body = resp.bytes().await?;
        let parsed: DeleteResponse = serde_json::from_slice(&body)
            .map_err(|e| TransportError::Contract(format!("delete response: {e}")))?;

        info!(file = name, %address, "remote file deleted");
        Ok(parsed)
    }
}

/// Full URL of `path` on `address`.
pub(crate) fn endpoint(address: &ServerAddress, path: &str) -> String {
    format!("{}{}", address.base_url(), path)
}

/// Percent-encodes one path segment.
pub(crate) fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

/// Turns a non-2xx response into [`TransportError::Status`] with its body.
pub(crate) async fn check_status(
    resp: reqwest::Response,
) -> Result<reqwest::Response, TransportError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(TransportError::Status {
        status: status.as_u16(),
        body,
    })
}

/// Runs `fut` until it completes or `cancel` fires.
pub(crate) async fn cancellable<T>(
    cancel: &CancellationToken,
    fut: impl Future<Output = Result<T, TransportError>>,
) -> Result<T, TransportError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(TransportError::Cancelled),
        result = fut => result,
    }
}

/// Waits at most `limit` for `fut`, mapping expiry to [`TransportError::Timeout`].
pub(crate) async fn bounded<T>(
    limit: Duration,
    fut: impl Future<Output = Result<T, reqwest::Error>>,
) -> Result<T, TransportError> {
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => Ok(result?),
        Err(_) => Err(TransportError::Timeout),
    }
}
