//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields
//!     → http::request access log (one line per exchange)
//!     → tower-http TraceLayer spans carrying the request id
//!
//! logging.rs installs the subscriber that writes them to stderr.
//! ```

pub mod logging;
