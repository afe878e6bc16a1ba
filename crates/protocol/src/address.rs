//! Server address and its syntactic validation.

use std::fmt;
use std::net::Ipv6Addr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_PORT;

/// Errors for a malformed [`ServerAddress`].
///
/// Raised before any network activity takes place.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("server host is required")]
    EmptyHost,

    #[error("invalid server host: {0}")]
    InvalidHost(String),

    #[error("port must be between 1 and 65535, got {0}")]
    InvalidPort(String),
}

/// Host and port of the remote file server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerAddress {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl ServerAddress {
    /// Creates a validated address.
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self, ConfigurationError> {
        let addr = Self {
            host: host.into(),
            port,
        };
        addr.validate()?;
        Ok(addr)
    }

    /// Checks that the address is well-formed.
    ///
    /// The host must be non-empty and contain no whitespace or path
    /// separators. Colons and brackets are only allowed as a bracketed IPv6
    /// literal such as `[::1]`. Port 0 is rejected.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let host = self.host.as_str();
        if host.trim().is_empty() {
            return Err(ConfigurationError::EmptyHost);
        }
        if host.chars().any(|c| c.is_whitespace() || c == '/' || c == '\\') {
            return Err(ConfigurationError::InvalidHost(host.to_string()));
        }

        let bracketed = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'));
        let valid = match bracketed {
            Some(inner) => inner.parse::<Ipv6Addr>().is_ok(),
            None => !host.contains([':', '[', ']']),
        };
        if !valid {
            return Err(ConfigurationError::InvalidHost(host.to_string()));
        }

        if self.port == 0 {
            return Err(ConfigurationError::InvalidPort(self.port.to_string()));
        }

        Ok(())
    }

    /// Base URL for requests, e.g. `http://192.168.0.105:5000`.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

impl FromStr for ServerAddress {
    type Err = ConfigurationError;

    /// Parses `host`, `host:port`, `[v6]` or `[v6]:port`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ConfigurationError::EmptyHost);
        }

        let (host, port) = if s.starts_with('[') {
            match s.find(']') {
                Some(end) => {
                    let host = &s[..=end];
                    let rest = &s[end + 1..];
                    match rest.strip_prefix(':') {
                        Some(port) => (host, Some(port)),
                        None if rest.is_empty() => (host, None),
                        None => return Err(ConfigurationError::InvalidHost(s.to_string())),
                    }
                }
                None => return Err(ConfigurationError::InvalidHost(s.to_string())),
            }
        } else {
            match s.rsplit_once(':') {
                Some((host, port)) => (host, Some(port)),
                None => (s, None),
            }
        };

        let port = match port {
            Some(p) => p
                .parse::<u16>()
                .map_err(|_| ConfigurationError::InvalidPort(p.to_string()))?,
            None => DEFAULT_PORT,
        };

        Self::new(host, port)
    }
}
