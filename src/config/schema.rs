//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.
//! Every field has a default so a missing or partial file still yields a
//! usable configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the file sharing server.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Directory whose subtree is exposed over HTTP.
    pub root: PathBuf,

    /// Bind address: "host:port", "ip:port" or ":port".
    pub bind_address: String,

    /// Compress GET responses when the client accepts gzip or deflate.
    pub compression: bool,

    /// Render a listing when a directory is requested.
    pub dir_listing: bool,

    /// Emit the access log and lifecycle events.
    pub verbose: bool,

    /// Server identity, sent in the `Server` header and listing footer.
    pub app_name: String,

    /// Optional TLS certificate and key pair.
    pub tls: Option<TlsConfig>,

    /// Upper bound on the graceful drain after shutdown is requested.
    pub shutdown_grace_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            bind_address: "0.0.0.0:3030".to_string(),
            compression: true,
            dir_listing: false,
            verbose: false,
            app_name: "hfs".to_string(),
            tls: None,
            shutdown_grace_secs: 10,
        }
    }
}

impl ServerConfig {
    /// `bind_address` in a form the listener accepts. A bare `:port` listens
    /// on every interface.
    pub fn listen_address(&self) -> String {
        if self.bind_address.starts_with(':') {
            format!("0.0.0.0{}", self.bind_address)
        } else {
            self.bind_address.clone()
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: PathBuf,

    /// Path to private key file (PEM).
    pub key_path: PathBuf,
}
