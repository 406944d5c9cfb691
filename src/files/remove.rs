//! DELETE handling. Only regular files may be removed.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tokio::fs;

use crate::error::{FileError, ACCESS_FORBIDDEN, DELETE_DIR_FORBIDDEN};
use crate::files::{EntryKind, FileService};

impl FileService {
    pub async fn remove(&self, uri_path: &str) -> Result<Response, FileError> {
        let path = self.resolver().resolve_checked(uri_path).await?;

        let metadata = fs::metadata(&path)
            .await
            .map_err(|e| FileError::not_found(&path, e))?;

        match EntryKind::of(metadata.file_type()) {
            EntryKind::File => {}
            EntryKind::Directory => return Err(FileError::forbidden(&path, DELETE_DIR_FORBIDDEN)),
            EntryKind::Socket | EntryKind::Special => {
                return Err(FileError::forbidden(&path, ACCESS_FORBIDDEN))
            }
        }

        fs::remove_file(&path)
            .await
            .map_err(|e| FileError::internal("remove file", e))?;

        tracing::debug!(path = ?path, "Removed file");
        Ok(StatusCode::OK.into_response())
    }
}
