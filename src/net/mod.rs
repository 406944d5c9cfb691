//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection (accepted by axum-server)
//!     → tls.rs (optional TLS handshake material)
//!     → Hand off to HTTP layer
//! ```
//!
//! # Design Decisions
//! - No admission control: concurrency is bounded by the acceptor only
//! - TLS is optional and handled transparently

pub mod tls;
