//! hfs: share a directory tree over HTTP.
//!
//! ```text
//!   hfs --root /srv/share --address 0.0.0.0:3030 --dir-listing true
//!
//!   flags / HFS_* env  ─┐
//!   <app>.toml          ├─▶ ServerConfig ─▶ validate ─▶ bind ─▶ serve
//!   defaults           ─┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use hfs::config::{discover_config, load_config, ServerConfig, TlsConfig};
use hfs::lifecycle::{startup, Shutdown};
use hfs::observability::logging;

const DEFAULT_APP_NAME: &str = "hfs";

#[derive(Parser, Debug)]
#[command(name = "hfs", version, about = "HTTP file sharing server", long_about = None)]
struct Args {
    /// Explicit config file; skips the search path.
    #[arg(short, long, env = "HFS_CONFIG")]
    config: Option<PathBuf>,

    /// Directory to serve.
    #[arg(short, long, env = "HFS_ROOT")]
    root: Option<PathBuf>,

    /// Listen address: 0.0.0.0:3030, localhost:3030 or :3030 (all interfaces).
    #[arg(short, long, env = "HFS_ADDRESS")]
    address: Option<String>,

    #[arg(long, env = "HFS_COMPRESSION")]
    compression: Option<bool>,

    #[arg(long, env = "HFS_DIR_LISTING")]
    dir_listing: Option<bool>,

    #[arg(short, long, env = "HFS_VERBOSE")]
    verbose: Option<bool>,

    /// PEM certificate; enables HTTPS together with --ssl-key.
    #[arg(long, env = "HFS_SSL_CERT")]
    ssl_cert: Option<PathBuf>,

    #[arg(long, env = "HFS_SSL_KEY")]
    ssl_key: Option<PathBuf>,

    /// Name used for config discovery and the Server header.
    #[arg(long, env = "HFS_APP_NAME")]
    app_name: Option<String>,
}

impl Args {
    fn apply(self, mut config: ServerConfig) -> ServerConfig {
        if let Some(app_name) = self.app_name {
            config.app_name = app_name;
        }
        if let Some(root) = self.root {
            config.root = root;
        }
        if let Some(address) = self.address {
            config.bind_address = address;
        }
        if let Some(compression) = self.compression {
            config.compression = compression;
        }
        if let Some(dir_listing) = self.dir_listing {
            config.dir_listing = dir_listing;
        }
        if let Some(verbose) = self.verbose {
            config.verbose = verbose;
        }

        // Flags only override the half of the pair they name.
        match (self.ssl_cert, self.ssl_key, config.tls.take()) {
            (None, None, tls) => config.tls = tls,
            (cert, key, tls) => {
                let (file_cert, file_key) = match tls {
                    Some(tls) => (Some(tls.cert_path), Some(tls.key_path)),
                    None => (None, None),
                };
                config.tls = Some(TlsConfig {
                    cert_path: cert.or(file_cert).unwrap_or_default(),
                    key_path: key.or(file_key).unwrap_or_default(),
                });
            }
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let (file_config, source) = match &args.config {
        Some(path) => (load_config(path)?, Some(path.clone())),
        None => discover_config(args.app_name.as_deref().unwrap_or(DEFAULT_APP_NAME))?,
    };
    let config = args.apply(file_config);

    logging::init(config.verbose);
    match &source {
        Some(path) => tracing::info!(path = ?path, "Loaded config file"),
        None => tracing::info!("No config file found, using defaults"),
    }
    tracing::info!("{} v{} starting", config.app_name, env!("CARGO_PKG_VERSION"));

    startup::start(config, Shutdown::new()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_file_values() {
        let args = Args::parse_from(["hfs", "--root", "/srv", "--dir-listing", "true"]);
        let file = ServerConfig {
            bind_address: "127.0.0.1:9000".into(),
            ..ServerConfig::default()
        };

        let config = args.apply(file);
        assert_eq!(config.root, PathBuf::from("/srv"));
        assert!(config.dir_listing);
        assert_eq!(config.bind_address, "127.0.0.1:9000");
        assert!(config.tls.is_none());
    }

    #[test]
    fn one_tls_flag_keeps_the_other_half_from_file() {
        let args = Args::parse_from(["hfs", "--ssl-cert", "/new/cert.pem"]);
        let file = ServerConfig {
            tls: Some(TlsConfig {
                cert_path: "/old/cert.pem".into(),
                key_path: "/old/key.pem".into(),
            }),
            ..ServerConfig::default()
        };

        let tls = args.apply(file).tls.unwrap();
        assert_eq!(tls.cert_path, PathBuf::from("/new/cert.pem"));
        assert_eq!(tls.key_path, PathBuf::from("/old/key.pem"));
    }
}
