//! Request handler errors and their HTTP mapping.

use std::io;
use std::path::{Path, PathBuf};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Body sent for forbidden special files and paths outside the root.
pub const ACCESS_FORBIDDEN: &str = "Not Allowed: Access to this resource is not allowed";
/// Body sent when a directory is requested with listings disabled.
pub const LISTING_FORBIDDEN: &str = "Not Allowed: Directory listing is forbidden";
/// Body sent when a DELETE targets a directory.
pub const DELETE_DIR_FORBIDDEN: &str = "Not Allowed: Delete directory is forbidden";

/// Failure of a file operation, already classified for the client.
#[derive(Debug, Error)]
pub enum FileError {
    /// The path could not be opened.
    #[error("cannot open {path:?}: {source}")]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The request is understood but refused.
    #[error("{reason} ({path:?})")]
    Forbidden {
        path: PathBuf,
        reason: &'static str,
    },

    /// Any I/O, codec or rendering failure on our side.
    #[error("{context}: {source}")]
    Internal {
        context: &'static str,
        #[source]
        source: io::Error,
    },
}

impl FileError {
    pub fn not_found(path: &Path, source: io::Error) -> Self {
        Self::NotFound {
            path: path.to_path_buf(),
            source,
        }
    }

    pub fn forbidden(path: &Path, reason: &'static str) -> Self {
        Self::Forbidden {
            path: path.to_path_buf(),
            reason,
        }
    }

    pub fn internal(context: &'static str, source: io::Error) -> Self {
        Self::Internal { context, source }
    }

    /// Status code the client receives.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short human-readable body. Paths and sources stay in the log.
    pub fn body(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "Not Found: Error while opening file",
            Self::Forbidden { reason, .. } => reason,
            Self::Internal { .. } => "Internal Error",
        }
    }
}

impl IntoResponse for FileError {
    fn into_response(self) -> Response {
        match &self {
            FileError::Internal { .. } => tracing::error!(error = %self, "Request failed"),
            _ => tracing::debug!(error = %self, "Request rejected"),
        }
        (self.status(), self.body()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_taxonomy() {
        let missing = FileError::not_found(Path::new("a"), io::ErrorKind::NotFound.into());
        let refused = FileError::forbidden(Path::new("a"), LISTING_FORBIDDEN);
        let broken = FileError::internal("stat file", io::Error::other("boom"));

        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert_eq!(refused.status(), StatusCode::FORBIDDEN);
        assert_eq!(broken.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(refused.body(), LISTING_FORBIDDEN);
        assert_eq!(broken.body(), "Internal Error");
    }
}
