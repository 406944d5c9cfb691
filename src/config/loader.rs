//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::ServerConfig;
use crate::config::validation::ValidationError;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Parse error in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse configuration from a TOML file.
///
/// Validation is left to the caller: command-line overrides are applied on
/// top of the file before the result is checked.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Candidate config files for `app_name`, most specific last.
///
/// `/etc/<app>/<app>.toml`, then `$HOME/.<app>/<app>.toml`, then
/// `./<app>.toml`.
pub fn config_search_paths(app_name: &str) -> Vec<PathBuf> {
    let file_name = format!("{app_name}.toml");
    let mut paths = vec![Path::new("/etc").join(app_name).join(&file_name)];
    if let Some(home) = std::env::var_os("HOME") {
        paths.push(PathBuf::from(home).join(format!(".{app_name}")).join(&file_name));
    }
    paths.push(PathBuf::from(&file_name));
    paths
}

/// Load the first config file found on the search path.
///
/// Returns the defaults and `None` when no candidate exists.
pub fn discover_config(app_name: &str) -> Result<(ServerConfig, Option<PathBuf>), ConfigError> {
    for candidate in config_search_paths(app_name) {
        if candidate.is_file() {
            let config = load_config(&candidate)?;
            return Ok((config, Some(candidate)));
        }
    }
    Ok((ServerConfig::default(), None))
}
