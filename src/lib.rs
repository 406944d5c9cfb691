//! HTTP file sharing server library.
//!
//! Serves one directory tree over HTTP: GET reads files (with compression,
//! conditional requests and a range start) or lists directories, POST
//! uploads, DELETE removes.

pub mod config;
pub mod error;
pub mod files;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use config::ServerConfig;
pub use error::FileError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
