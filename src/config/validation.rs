//! Configuration validation.
//!
//! Serde handles syntax; this module checks that the values make sense for a
//! running server. All problems are reported at once, not just the first.

use std::net::ToSocketAddrs;
use std::path::PathBuf;

use axum::http::HeaderValue;
use thiserror::Error;

use crate::config::schema::ServerConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("root {0:?} is not an existing directory")]
    RootNotDirectory(PathBuf),
    #[error("bind address {0:?} does not resolve to a socket address")]
    BindAddress(String),
    #[error("TLS needs both a certificate and a key")]
    IncompleteTls,
    #[error("app name {0:?} cannot be used as a Server header")]
    AppName(String),
}

/// Check a configuration before the server accepts it.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if !config.root.is_dir() {
        errors.push(ValidationError::RootNotDirectory(config.root.clone()));
    }

    let resolvable = config
        .listen_address()
        .to_socket_addrs()
        .is_ok_and(|mut addrs| addrs.next().is_some());
    if !resolvable {
        errors.push(ValidationError::BindAddress(config.bind_address.clone()));
    }

    if let Some(tls) = &config.tls {
        if tls.cert_path.as_os_str().is_empty() || tls.key_path.as_os_str().is_empty() {
            errors.push(ValidationError::IncompleteTls);
        }
    }

    if config.app_name.trim().is_empty() || HeaderValue::from_str(&config.app_name).is_err() {
        errors.push(ValidationError::AppName(config.app_name.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::TlsConfig;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(validate_config(&ServerConfig::default()), Ok(()));
    }

    #[test]
    fn host_names_and_bare_ports_are_accepted() {
        for address in [":3030", "localhost:3030", "127.0.0.1:0"] {
            let config = ServerConfig {
                bind_address: address.to_string(),
                ..ServerConfig::default()
            };
            assert_eq!(validate_config(&config), Ok(()), "{address}");
        }
        assert_eq!(
            ServerConfig {
                bind_address: ":3030".into(),
                ..ServerConfig::default()
            }
            .listen_address(),
            "0.0.0.0:3030"
        );
    }

    #[test]
    fn collects_every_problem() {
        let config = ServerConfig {
            root: PathBuf::from("/no/such/root"),
            bind_address: "nonsense".to_string(),
            app_name: "bad\nname".to_string(),
            tls: Some(TlsConfig {
                cert_path: PathBuf::from("cert.pem"),
                key_path: PathBuf::new(),
            }),
            ..ServerConfig::default()
        };

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::IncompleteTls));
        assert!(errors.contains(&ValidationError::BindAddress("nonsense".to_string())));
    }
}
