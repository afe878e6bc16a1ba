//! Error types for the HTTP transport.

use filesync_protocol::ConfigurationError;

/// Failure of a single transport operation.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("network error: {0}")]
    Http(reqwest::Error),

    #[error("server responded with {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request timed out")]
    Timeout,

    #[error("cancelled")]
    Cancelled,

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("no local source for {0}")]
    MissingSource(String),

    #[error("invalid file name: {0}")]
    InvalidName(String),

    #[error("unexpected server response: {0}")]
    Contract(String),
}

impl TransportError {
    /// HTTP status code behind the failure, if the server answered.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::Http(e)
        }
    }
}

/// Failure to register a download with the media collection.
///
/// Never fails a download; it is logged and dropped.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_message_includes_code_and_body() {
        let err = TransportError::Status {
            status: 400,
            body: "No files part in request".into(),
        };
        assert_eq!(
            err.to_string(),
            "server responded with 400: No files part in request"
        );
        assert_eq!(err.http_status(), Some(400));
    }

    #[test]
    fn io_error_reads_naturally() {
        let err = TransportError::from(std::io::Error::other("disk full"));
        assert_eq!(err.to_string(), "disk full");
        assert_eq!(err.http_status(), None);
    }

    #[test]
    fn configuration_error_converts() {
        let err: TransportError = ConfigurationError::EmptyHost.into();
        assert!(matches!(err, TransportError::Configuration(_)));
    }
}
