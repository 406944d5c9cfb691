//! File transfer engine.
//!
//! # Data Flow
//! ```text
//! dispatcher (http/server.rs)
//!     → path.rs (clean URL path, join root, containment check)
//!     → GET:    serve.rs (conditional GET, MIME, range, compression, stream)
//!                 ↳ listing.rs (index.html or generated listing)
//!     → POST:   upload.rs (mkdir -p, create, optional decompression)
//!     → DELETE: remove.rs (type checks, unlink)
//! ```
//!
//! # Design Decisions
//! - Every request opens its own handles; nothing is cached between requests
//! - Handlers return `FileError`, which maps itself onto a status and body
//! - Compression is a transfer envelope only (encoding.rs)

pub mod encoding;
pub mod listing;
pub mod path;
pub mod range;
pub mod remove;
pub mod serve;
pub mod upload;

use std::fs::FileType;
use std::io;
use std::sync::Arc;

use axum::http::{header::HeaderName, HeaderMap};

use crate::config::ServerConfig;
use crate::files::path::PathResolver;

/// Chunk size used when streaming file contents.
pub const FS_MAX_BUF_SIZE: usize = 4096;

/// Handlers for the three supported verbs, bound to one configuration.
#[derive(Debug)]
pub struct FileService {
    config: Arc<ServerConfig>,
    resolver: PathResolver,
}

impl FileService {
    /// Fails when the configured root cannot be canonicalized.
    pub fn new(config: Arc<ServerConfig>) -> io::Result<Self> {
        let resolver = PathResolver::new(&config.root)?;
        Ok(Self { config, resolver })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }
}

/// The parts of a request that GET negotiation looks at.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    /// Raw (still percent-encoded) URL path.
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub headers: &'a HeaderMap,
}

impl<'a> RequestContext<'a> {
    /// Header value as text; absent or non-ASCII values read as `None`.
    pub fn header(&self, name: HeaderName) -> Option<&'a str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// `true` when the query string carries a `dl` parameter.
    pub fn wants_download(&self) -> bool {
        self.query.is_some_and(|query| {
            url::form_urlencoded::parse(query.as_bytes()).any(|(key, _)| key == "dl")
        })
    }
}

/// What kind of filesystem entry a path names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Socket,
    /// FIFOs, devices and anything else that is not safe to stream.
    Special,
}

impl EntryKind {
    pub fn of(file_type: FileType) -> Self {
        if file_type.is_dir() {
            Self::Directory
        } else if file_type.is_file() {
            Self::File
        } else if is_socket(&file_type) {
            Self::Socket
        } else {
            Self::Special
        }
    }
}

#[cfg(unix)]
fn is_socket(file_type: &FileType) -> bool {
    use std::os::unix::fs::FileTypeExt;
    file_type.is_socket()
}

#[cfg(not(unix))]
fn is_socket(_file_type: &FileType) -> bool {
    false
}
