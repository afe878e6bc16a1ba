//! Best-effort registration of downloads with a user-visible media collection.

use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use tracing::debug;

use crate::error::MediaError;

/// Album name downloads are collected under.
pub const DEFAULT_ALBUM: &str = "FileSync Downloads";

/// Makes a finished download visible in a media collection.
///
/// Called once per successful download. Errors are logged by the caller and
/// never fail the download itself.
pub trait MediaRegistrar: Send + Sync {
    fn register<'a>(
        &'a self,
        path: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<(), MediaError>> + Send + 'a>>;
}

/// Registrar that does nothing.
pub struct NoMediaRegistrar;

impl MediaRegistrar for NoMediaRegistrar {
    fn register<'a>(
        &'a self,
        _path: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<(), MediaError>> + Send + 'a>> {
        Box::pin(async { Ok(()) })
    }
}

/// Copies each download into an album directory, e.g.
/// `~/Pictures/FileSync Downloads/`.
pub struct AlbumRegistrar {
    album_dir: PathBuf,
}

impl AlbumRegistrar {
    /// Creates a registrar for the album `name` under `media_root`.
    pub fn new(media_root: impl AsRef<Path>, name: &str) -> Self {
        Self {
            album_dir: media_root.as_ref().join(name),
        }
    }

    /// Directory files are copied into.
    pub fn album_dir(&self) -> &Path {
        &self.album_dir
    }
}

impl MediaRegistrar for AlbumRegistrar {
    fn register<'a>(
        &'a self,
        path: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<(), MediaError>> + Send + 'a>> {
        Box::pin(async move {
            let Some(file_name) = path.file_name() else {
                return Ok(());
            };

            tokio::fs::create_dir_all(&self.album_dir)
                .await
                .map_err(|e| permission_aware(e, &self.album_dir))?;

            let target = self.album_dir.join(file_name);
            tokio::fs::copy(path, &target)
                .await
                .map_err(|e| permission_aware(e, &target))?;

            debug!(path = %target.display(), "download added to album");
            Ok(())
        })
    }
}

fn permission_aware(e: std::io::Error, path: &Path) -> MediaError {
    if e.kind() == ErrorKind::PermissionDenied {
        MediaError::PermissionDenied(path.display().to_string())
    } else {
        MediaError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn album_registrar_copies_file() {
        let downloads = tempfile::tempdir().unwrap();
        let media = tempfile::tempdir().unwrap();
        let file = downloads.path().join("song.mp3");
        std::fs::write(&file, b"ID3").unwrap();

        let registrar = AlbumRegistrar::new(media.path(), DEFAULT_ALBUM);
        registrar.register(&file).await.unwrap();

        let copied = media.path().join(DEFAULT_ALBUM).join("song.mp3");
        assert_eq!(std::fs::read(copied).unwrap(), b"ID3");
        // Source file stays in place.
        assert!(file.exists());
    }

    #[tokio::test]
    async fn album_registrar_missing_source_errors() {
        let media = tempfile::tempdir().unwrap();
        let registrar = AlbumRegistrar::new(media.path(), DEFAULT_ALBUM);
        let result = registrar.register(Path::new("/nonexistent/file.jpg")).await;
        assert!(matches!(result, Err(MediaError::Io(_))));
    }

    #[tokio::test]
    async fn no_media_registrar_is_noop() {
        assert!(
            NoMediaRegistrar
                .register(Path::new("/nonexistent"))
                .await
                .is_ok()
        );
    }
}
