//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, request id, Server header)
//!     → request.rs (access log for every exchange)
//!     → dispatch by method into files::FileService
//!         GET    → serve (file, listing, index.html)
//!         POST   → upload
//!         DELETE → remove
//!     → Send to client
//! ```

pub mod request;
pub mod server;

pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer, ServerError};
