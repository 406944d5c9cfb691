//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener};
use std::path::Path;

use axum::Router;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use hfs::{HttpServer, ServerConfig, Shutdown};
use tempfile::TempDir;
use tokio::task::JoinHandle;

/// Config serving `root` on an ephemeral loopback port.
pub fn config_for(root: &Path) -> ServerConfig {
    ServerConfig {
        root: root.to_path_buf(),
        bind_address: "127.0.0.1:0".into(),
        ..ServerConfig::default()
    }
}

/// Fully layered router over `root`, for in-process `oneshot` requests.
pub fn router(root: &Path, tweak: impl FnOnce(&mut ServerConfig)) -> Router {
    let mut config = config_for(root);
    tweak(&mut config);
    HttpServer::new(config).unwrap().router()
}

/// A server running on a real socket over a temporary root.
pub struct TestServer {
    pub addr: SocketAddr,
    pub root: TempDir,
    shutdown: Shutdown,
    task: JoinHandle<()>,
}

impl TestServer {
    pub async fn spawn(tweak: impl FnOnce(&mut ServerConfig)) -> Self {
        let root = tempfile::tempdir().unwrap();
        let mut config = config_for(root.path());
        tweak(&mut config);

        let listener = TcpListener::bind(&config.bind_address).unwrap();
        let addr = listener.local_addr().unwrap();
        let server = HttpServer::new(config).unwrap();

        let shutdown = Shutdown::new();
        let task = {
            let shutdown = shutdown.clone();
            tokio::spawn(async move {
                server.run(listener, shutdown).await.unwrap();
            })
        };

        Self {
            addr,
            root,
            shutdown,
            task,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Address in the client's `hfs://` form.
    pub fn hfs(&self, path: &str) -> String {
        format!("hfs://{}{}", self.addr, path)
    }

    pub async fn stop(self) {
        self.shutdown.trigger();
        self.task.await.unwrap();
    }
}

pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

pub fn gunzip(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    GzDecoder::new(data).read_to_end(&mut out).unwrap();
    out
}

/// Client that leaves bodies exactly as the server sent them.
pub fn raw_client() -> reqwest::Client {
    reqwest::Client::builder().build().unwrap()
}
