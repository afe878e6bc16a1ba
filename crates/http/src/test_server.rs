//! One-shot mock HTTP server for transport tests.

use std::path::Path;
use std::time::Duration;

use filesync_protocol::ServerAddress;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use crate::client::{ClientOptions, ServerClient};

/// Canned response written by the mock server.
pub(crate) struct MockResponse {
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
    send_length: bool,
}

impl MockResponse {
    pub(crate) fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.as_bytes().to_vec(),
            send_length: true,
        }
    }

    pub(crate) fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: body.as_bytes().to_vec(),
            send_length: true,
        }
    }

    pub(crate) fn bytes(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_type: "application/octet-stream",
            body,
            send_length: true,
        }
    }

    /// Omits `Content-Length`; the body ends when the connection closes.
    pub(crate) fn without_length(mut self) -> Self {
        self.send_length = false;
        self
    }
}

/// Request as seen by the mock server.
pub(crate) struct CapturedRequest {
    /// Request line and headers.
    pub(crate) head: String,
    pub(crate) body: Vec<u8>,
}

impl CapturedRequest {
    /// Case-insensitive header lookup.
    pub(crate) fn header(&self, name: &str) -> Option<String> {
        self.head.lines().skip(1).find_map(|line| {
            let (k, v) = line.split_once(':')?;
            k.trim()
                .eq_ignore_ascii_case(name)
                .then(|| v.trim().to_string())
        })
    }
}

pub(crate) fn test_client(dir: &Path) -> ServerClient {
    ServerClient::new(ClientOptions {
        download_dir: dir.to_path_buf(),
        ..ClientOptions::default()
    })
    .unwrap()
}

pub(crate) fn test_client_with_timeout(dir: &Path, response_timeout: Duration) -> ServerClient {
    ServerClient::new(ClientOptions {
        response_timeout,
        download_dir: dir.to_path_buf(),
        ..ClientOptions::default()
    })
    .unwrap()
}

/// Serves a single request with `response` and returns what was received.
pub(crate) async fn serve_once(
    response: MockResponse,
) -> (ServerAddress, JoinHandle<CapturedRequest>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let address = ServerAddress::new("127.0.0.1", port).unwrap();

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let request = read_request(&mut stream).await;

        let mut head = format!(
            "HTTP/1.1 {} Mock\r\nContent-Type: {}\r\nConnection: close\r\n",
            response.status, response.content_type
        );
        if response.send_length {
            head.push_str(&format!("Content-Length: {}\r\n", response.body.len()));
        }
        head.push_str("\r\n");

        let _ = stream.write_all(head.as_bytes()).await;
        let _ = stream.write_all(&response.body).await;
        let _ = stream.shutdown().await;
        request
    });

    (address, handle)
}

/// Accepts one connection, reads the request and never answers.
pub(crate) async fn serve_silent() -> (ServerAddress, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let address = ServerAddress::new("127.0.0.1", port).unwrap();

    let handle = tokio::spawn(async move {
        if let Ok((mut stream, _)) = listener.accept().await {
            let _ = read_request(&mut stream).await;
            tokio::time::sleep(Duration::from_secs(60)).await;
        }
    });

    (address, handle)
}

/// Answers with headers declaring `declared` bytes, sends `partial`, then
/// stalls without closing the connection.
pub(crate) async fn serve_stalled(
    partial: &'static [u8],
    declared: usize,
) -> (ServerAddress, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let address = ServerAddress::new("127.0.0.1", port).unwrap();

    let handle = tokio::spawn(async move {
        if let Ok((mut stream, _)) = listener.accept().await {
            let _ = read_request(&mut stream).await;
            let head = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\n\
                 Content-Length: {declared}\r\n\r\n"
            );
            let _ = stream.write_all(head.as_bytes()).await;
            let _ = stream.write_all(partial).await;
            let _ = stream.flush().await;
            tokio::time::sleep(Duration::from_secs(60)).await;
        }
    });

    (address, handle)
}

async fn read_request(stream: &mut TcpStream) -> CapturedRequest {
    let mut buf = Vec::new();
    let mut chunk = vec![0u8; 8192];

    let head_end = loop {
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos;
        }
        let n = stream.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break buf.len();
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).into_owned();
    let mut captured = CapturedRequest {
        head,
        body: Vec::new(),
    };

    let length: usize = captured
        .header("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);

    let mut body = buf.get(head_end + 4..).map(<[u8]>::to_vec).unwrap_or_default();
    while body.len() < length {
        let n = stream.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }

    captured.body = body;
    captured
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
