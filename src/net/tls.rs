//! TLS configuration and certificate loading.

use std::path::PathBuf;

use axum_server::tls_rustls::RustlsConfig;
use thiserror::Error;

use crate::config::TlsConfig;

/// Error type for certificate loading.
#[derive(Debug, Error)]
pub enum TlsError {
    #[error("Certificate file not found: {0:?}")]
    MissingCertificate(PathBuf),
    #[error("Private key file not found: {0:?}")]
    MissingKey(PathBuf),
    #[error("Failed to load TLS material: {0}")]
    Load(#[source] std::io::Error),
}

/// Load TLS configuration from the certificate and key files.
pub async fn load_tls_config(tls: &TlsConfig) -> Result<RustlsConfig, TlsError> {
    if !tls.cert_path.is_file() {
        return Err(TlsError::MissingCertificate(tls.cert_path.clone()));
    }
    if !tls.key_path.is_file() {
        return Err(TlsError::MissingKey(tls.key_path.clone()));
    }

    tracing::info!(cert = ?tls.cert_path, key = ?tls.key_path, "Loading TLS certificate");
    RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path)
        .await
        .map_err(TlsError::Load)
}
