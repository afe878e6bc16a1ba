//! Remote file listing.

use filesync_protocol::{FILES_PATH, RemoteFileEntry, ServerAddress};
use filesync_transfer::FileDescriptor;
use reqwest::header::ACCEPT;
use tracing::debug;

use crate::client::{ServerClient, check_status, endpoint};
use crate::error::TransportError;

impl ServerClient {
    /// Fetches `GET /files` and returns the server's files in server order.
    ///
    /// Entries come back unselected. A body that is not a JSON array of
    /// `{name, size}` objects is a [`TransportError::Contract`] failure.
    pub async fn fetch_listing(
        &self,
        address: &ServerAddress,
    ) -> Result<Vec<FileDescriptor>, TransportError> {
        address.validate()?;
        let url = endpoint(address, FILES_PATH);

        let resp = self
            .http
            .get(&url)
            .header(ACCEPT, "application/json")
            .timeout(self.options.response_timeout)
            .send()
            .await?;
        let resp = check_status(resp).await?;

        let body = resp.bytes().await?;
        let entries: Vec<RemoteFileEntry> = serde_json::from_slice(&body)
            .map_err(|e| TransportError::Contract(format!("file listing: {e}")))?;

        debug!(%address, count = entries.len(), "listing fetched");
        Ok(entries.into_iter().map(FileDescriptor::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::{MockResponse, serve_once, test_client};

    #[tokio::test]
    async fn listing_maps_entries_in_order() {
        let (address, handle) = serve_once(MockResponse::json(
            200,
            r#"[{"name":"a.txt","size":10},{"name":"b.txt","size":20}]"#,
        ))
        .await;
        let dir = tempfile::tempdir().unwrap();

        let files = test_client(dir.path()).fetch_listing(&address).await.unwrap();

        let pairs: Vec<_> = files.iter().map(|f| (f.name.as_str(), f.size)).collect();
        assert_eq!(pairs, vec![("a.txt", 10), ("b.txt", 20)]);
        assert!(files.iter().all(|f| !f.selected && f.source.is_none()));

        let req = handle.await.unwrap();
        assert!(req.head.starts_with("GET /files "));
        assert!(req.header("accept").unwrap().contains("application/json"));
    }

    #[tokio::test]
    async fn listing_empty() {
        let (address, handle) = serve_once(MockResponse::json(200, "[]")).await;
        let dir = tempfile::tempdir().unwrap();

        let files = test_client(dir.path()).fetch_listing(&address).await.unwrap();
        assert!(files.is_empty());
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn listing_wrong_shape_is_contract_error() {
        let (address, handle) =
            serve_once(MockResponse::json(200, r#"{"files":["a.txt"]}"#)).await;
        let dir = tempfile::tempdir().unwrap();

        let err = test_client(dir.path())
            .fetch_listing(&address)
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Contract(_)));
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn listing_server_error() {
        let (address, handle) = serve_once(MockResponse::text(500, "boom")).await;
        let dir = tempfile::tempdir().unwrap();

        let err = test_client(dir.path())
            .fetch_listing(&address)
            .await
            .unwrap_err();
        assert_eq!(err.http_status(), Some(500));
        assert!(err.to_string().contains("boom"));
        handle.await.unwrap();
    }
}
