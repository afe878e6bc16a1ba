//! Client configuration management.
//!
//! Stored as JSON at `~/.config/filesync/config.json`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use filesync_http::{AlbumRegistrar, ClientOptions, DEFAULT_ALBUM};
use filesync_protocol::ServerAddress;
use serde::{Deserialize, Serialize};

fn default_connect_timeout() -> u64 {
    filesync_http::CONNECT_TIMEOUT.as_secs()
}

fn default_response_timeout() -> u64 {
    filesync_http::RESPONSE_TIMEOUT.as_secs()
}

/// Persisted client settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Last configured server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerAddress>,

    /// Where downloads are written. Defaults to `~/Downloads/FileSync`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_dir: Option<PathBuf>,

    /// When set, each download is also copied into the
    /// `FileSync Downloads` album under this directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_root: Option<PathBuf>,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_response_timeout")]
    pub response_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: None,
            download_dir: None,
            media_root: None,
            connect_timeout_secs: default_connect_timeout(),
            response_timeout_secs: default_response_timeout(),
        }
    }
}

impl ClientConfig {
    /// Loads the configuration from the default location.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&config_path())
    }

    /// Loads the configuration from `path`.
    ///
    /// A missing file yields defaults, and so does a file that does not
    /// parse, with a warning.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        match serde_json::from_str(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse client config, using defaults"
                );
                Ok(Self::default())
            }
        }
    }

    /// Saves the configuration to the default location.
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&config_path())
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        set_permissions_0600(path);

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Effective download directory.
    pub fn download_dir(&self) -> PathBuf {
        self.download_dir
            .clone()
            .unwrap_or_else(default_download_dir)
    }

    /// Transport options derived from this configuration.
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            response_timeout: Duration::from_secs(self.response_timeout_secs),
            download_dir: self.download_dir(),
        }
    }

    /// Album registrar, if a media root is configured.
    pub fn media_registrar(&self) -> Option<AlbumRegistrar> {
        self.media_root
            .as_ref()
            .map(|root| AlbumRegistrar::new(root, DEFAULT_ALBUM))
    }
}

fn set_permissions_0600(path: &Path) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600));
    }
    #[cfg(not(unix))]
    {
        let _ = path;
    }
}

/// Path of the configuration file.
pub fn config_path() -> PathBuf {
    config_base_dir().join("filesync").join("config.json")
}

fn home_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    let var = "USERPROFILE";
    #[cfg(not(target_os = "windows"))]
    let var = "HOME";

    std::env::var_os(var)
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir)
}

fn config_base_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA")
            .map(PathBuf::from)
            .unwrap_or_else(home_dir)
    }

    #[cfg(not(target_os = "windows"))]
    {
        std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| home_dir().join(".config"))
    }
}

fn default_download_dir() -> PathBuf {
    home_dir().join("Downloads").join("FileSync")
}
