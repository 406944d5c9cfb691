//! POST handling: materialize the request body at the resolved path.

use std::io;
use std::path::Path;

use axum::body::Body;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use futures_util::TryStreamExt;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio_util::io::StreamReader;

use crate::error::FileError;
use crate::files::encoding::{BodyReader, ContentCoding};
use crate::files::FileService;

impl FileService {
    /// Create or truncate the target and copy the (decoded) body into it.
    ///
    /// Parent directories are created as needed. Nothing is rolled back on
    /// failure.
    pub async fn upload(
        &self,
        uri_path: &str,
        headers: &HeaderMap,
        body: Body,
    ) -> Result<Response, FileError> {
        let path = self.resolver().resolve_checked(uri_path).await?;

        if let Some(parent) = path.parent() {
            create_parents(parent)
                .await
                .map_err(|e| FileError::internal("create parent directories", e))?;
        }

        let mut file = File::create(&path)
            .await
            .map_err(|e| FileError::internal("create file", e))?;

        let coding = headers
            .get(header::CONTENT_ENCODING)
            .and_then(|value| value.to_str().ok())
            .and_then(ContentCoding::from_content_encoding);

        let stream = body.into_data_stream().map_err(io::Error::other);
        let reader = BodyReader::new(StreamReader::new(stream), coding);
        let written = reader
            .copy_to(&mut file)
            .await
            .map_err(|e| FileError::internal("write upload", e))?;
        file.flush()
            .await
            .map_err(|e| FileError::internal("write upload", e))?;

        tracing::debug!(
            path = ?path,
            bytes = written,
            coding = coding.map(ContentCoding::as_str),
            "Stored upload"
        );

        Ok(StatusCode::OK.into_response())
    }
}

#[cfg(unix)]
async fn create_parents(dir: &Path) -> io::Result<()> {
    tokio::fs::DirBuilder::new()
        .recursive(true)
        .mode(0o777)
        .create(dir)
        .await
}

#[cfg(not(unix))]
async fn create_parents(dir: &Path) -> io::Result<()> {
    tokio::fs::create_dir_all(dir).await
}
