//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, discovered or explicit)
//!     → loader.rs (parse & deserialize)
//!     → CLI / environment overrides (main.rs)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!     → shared via Arc with the request handlers
//! ```
//!
//! # Design Decisions
//! - Config is immutable once the server starts
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{discover_config, load_config, ConfigError};
pub use schema::{ServerConfig, TlsConfig};
pub use validation::{validate_config, ValidationError};
