//! Client for hfs file servers.
//!
//! Addresses use the `hfs://` (plain HTTP) and `hfss://` (HTTPS) schemes;
//! a bare `host:port/path` is treated as `hfs://`.
//!
//! ```no_run
//! # async fn demo() -> Result<(), hfs_client::ClientError> {
//! let mut file = hfs_client::create("hfs://localhost:3030/notes.txt")?;
//! file.write(b"hello").await?;
//! file.close()?;
//!
//! let body = hfs_client::open("hfs://localhost:3030/notes.txt")?
//!     .read_to_end()
//!     .await?;
//! assert_eq!(body, b"hello");
//!
//! hfs_client::remove("hfs://localhost:3030/notes.txt").await?;
//! # Ok(())
//! # }
//! ```

pub mod address;
pub mod client;
pub mod error;

pub use address::{translate, RemoteAddress};
pub use client::{create, open, remove, RemoteFile};
pub use error::ClientError;
