//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration
//! - Build the HTTP server (canonical root, router)
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The listener binds last, so traffic only arrives once the server is ready

use std::net::TcpListener;

use thiserror::Error;

use crate::config::{validate_config, ConfigError, ServerConfig};
use crate::http::{HttpServer, ServerError};
use crate::lifecycle::Shutdown;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Server(#[from] ServerError),
}

/// Validate `config`, bind its address and serve until shutdown.
pub async fn start(config: ServerConfig, shutdown: Shutdown) -> Result<(), StartupError> {
    validate_config(&config).map_err(ConfigError::Validation)?;

    tracing::info!(
        root = ?config.root,
        bind_address = %config.bind_address,
        compression = config.compression,
        dir_listing = config.dir_listing,
        tls = config.tls.is_some(),
        "Configuration loaded"
    );

    let server = HttpServer::new(config)?;
    let address = server.config().listen_address();
    let listener =
        TcpListener::bind(&address).map_err(|source| StartupError::Bind { address, source })?;

    server.run(listener, shutdown).await?;
    Ok(())
}
