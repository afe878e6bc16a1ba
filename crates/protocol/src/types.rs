use serde::{Deserialize, Serialize};

/// One entry of the `GET /files` listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFileEntry {
    pub name: String,
    pub size: u64,
}

/// Body returned by `POST /upload`.
///
/// The client treats it as opaque; it is parsed only for logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub uploaded_files: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Body returned by `DELETE /delete/{name}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_parses_server_shape() {
        let json = r#"[{"name":"a.txt","size":10},{"name":"b.txt","size":20}]"#;
        let entries: Vec<RemoteFileEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "a.txt");
        assert_eq!(entries[1].size, 20);
    }

    #[test]
    fn listing_rejects_missing_size() {
        let json = r#"[{"name":"a.txt"}]"#;
        assert!(serde_json::from_str::<Vec<RemoteFileEntry>>(json).is_err());
    }

    #[test]
    fn listing_rejects_negative_size() {
        let json = r#"[{"name":"a.txt","size":-1}]"#;
        assert!(serde_json::from_str::<Vec<RemoteFileEntry>>(json).is_err());
    }

    #[test]
    fn upload_response_success() {
        let json = r#"{"status":"success","uploaded_files":["a.txt"]}"#;
        let resp: UploadResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.status, "success");
        assert_eq!(resp.uploaded_files, vec!["a.txt".to_string()]);
        assert!(resp.message.is_none());
    }

    #[test]
    fn upload_response_failure_has_message() {
        let json = r#"{"status":"fail","message":"No files part in request"}"#;
        let resp: UploadResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.status, "fail");
        assert!(resp.uploaded_files.is_empty());
        assert_eq!(resp.message.as_deref(), Some("No files part in request"));
    }

    #[test]
    fn delete_response_not_found() {
        let json = r#"{"status":"fail","message":"File not found"}"#;
        let resp: DeleteResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.message, "File not found");
    }
}
