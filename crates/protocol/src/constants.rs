/// Port the server listens on unless configured otherwise.
pub const DEFAULT_PORT: u16 = 5000;

/// Listing endpoint: `GET /files`.
pub const FILES_PATH: &str = "/files";

/// Upload endpoint: `POST /upload` (multipart).
pub const UPLOAD_PATH: &str = "/upload";

/// Download endpoint prefix: `GET /download/{name}`.
pub const DOWNLOAD_PATH: &str = "/download";

/// Delete endpoint prefix: `DELETE /delete/{name}`.
pub const DELETE_PATH: &str = "/delete";

/// Multipart field the server reads uploaded files from.
///
/// The server looks the part up by this exact, case-sensitive name and
/// rejects the request with 400 when it is missing.
pub const UPLOAD_FIELD_NAME: &str = "files";

/// Content type sent for uploads without a media hint.
pub const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";
