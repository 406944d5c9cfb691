//! GET handling: conditional requests, content type, range start and
//! response compression, then a bounded-buffer stream of the file.

use std::io::{self, SeekFrom};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::body::Body;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use httpdate::{fmt_http_date, parse_http_date};
use tokio::fs::{self, File};
use tokio::io::{AsyncReadExt, AsyncSeekExt, DuplexStream};
use tokio_util::io::ReaderStream;

use crate::error::{FileError, ACCESS_FORBIDDEN, LISTING_FORBIDDEN};
use crate::files::encoding::{ContentCoding, ResponseWriter};
use crate::files::range::parse_range_start;
use crate::files::{EntryKind, FileService, RequestContext, FS_MAX_BUF_SIZE};

const OCTET_STREAM: &str = "application/octet-stream";

impl FileService {
    /// Serve the entry behind `ctx.path`.
    pub async fn serve(&self, ctx: &RequestContext<'_>) -> Result<Response, FileError> {
        let path = self.resolver().resolve_checked(ctx.path).await?;

        // Type check before opening: opening a FIFO would block.
        let metadata = fs::metadata(&path)
            .await
            .map_err(|e| FileError::not_found(&path, e))?;

        match EntryKind::of(metadata.file_type()) {
            EntryKind::Directory if !self.config().dir_listing => {
                Err(FileError::forbidden(&path, LISTING_FORBIDDEN))
            }
            EntryKind::Directory => self.list_directory(&path, ctx).await,
            EntryKind::File => self.send_file(&path, ctx).await,
            EntryKind::Socket | EntryKind::Special => {
                Err(FileError::forbidden(&path, ACCESS_FORBIDDEN))
            }
        }
    }

    /// Stream a regular file, negotiating headers from `ctx`.
    pub(crate) async fn send_file(
        &self,
        path: &Path,
        ctx: &RequestContext<'_>,
    ) -> Result<Response, FileError> {
        let mut file = File::open(path)
            .await
            .map_err(|e| FileError::not_found(path, e))?;
        let metadata = file
            .metadata()
            .await
            .map_err(|e| FileError::internal("stat file", e))?;
        if !metadata.is_file() {
            return Err(FileError::forbidden(path, ACCESS_FORBIDDEN));
        }
        let size = metadata.len();

        let mut headers = HeaderMap::new();

        let modified = metadata.modified().ok().and_then(whole_seconds);
        if let Some(modified) = modified {
            let since = ctx
                .header(header::IF_MODIFIED_SINCE)
                .and_then(|value| parse_http_date(value).ok())
                .and_then(whole_seconds);
            if since.is_some_and(|since| modified <= since) {
                return Ok(StatusCode::NOT_MODIFIED.into_response());
            }
            let last_modified = fmt_http_date(UNIX_EPOCH + Duration::from_secs(modified));
            headers.insert(header::LAST_MODIFIED, header_value(last_modified)?);
        }

        let content_type = if ctx.wants_download() {
            OCTET_STREAM
        } else {
            mime_guess::from_path(path).first_raw().unwrap_or(OCTET_STREAM)
        };
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));

        let mut start = 0;
        if let Some(range) = ctx.header(header::RANGE) {
            let requested = parse_range_start(range);
            if requested < size {
                file.seek(SeekFrom::Start(requested))
                    .await
                    .map_err(|e| FileError::internal("seek file", e))?;
                start = requested;
                headers.insert(
                    header::CONTENT_RANGE,
                    header_value(format!("bytes {}-{}/{}", start, size - 1, size))?,
                );
            }
        }

        let coding = if self.config().compression {
            ctx.header(header::ACCEPT_ENCODING)
                .and_then(ContentCoding::negotiate)
        } else {
            None
        };
        match coding {
            Some(coding) => {
                headers.insert(
                    header::CONTENT_ENCODING,
                    HeaderValue::from_static(coding.as_str()),
                );
            }
            None => {
                headers.insert(header::CONTENT_LENGTH, HeaderValue::from(size - start));
            }
        }

        tracing::debug!(
            path = ?path,
            size,
            start,
            coding = coding.map(ContentCoding::as_str),
            "Serving file"
        );

        let chunk = FS_MAX_BUF_SIZE.min(usize::try_from(size).unwrap_or(usize::MAX)).max(1);
        let (reader, writer) = tokio::io::duplex(FS_MAX_BUF_SIZE * 4);
        let writer = ResponseWriter::new(writer, coding);
        tokio::spawn(pump(file, writer, chunk, path.to_path_buf()));

        let body = Body::from_stream(ReaderStream::with_capacity(reader, FS_MAX_BUF_SIZE));
        Ok((StatusCode::OK, headers, body).into_response())
    }
}

/// Copy `file` into the response pipe until EOF, then finish the codec.
///
/// Headers are already on the wire by the time this runs, so failures can
/// only be logged.
async fn pump(
    mut file: File,
    mut out: ResponseWriter<DuplexStream>,
    chunk: usize,
    path: PathBuf,
) {
    let mut buf = vec![0u8; chunk];
    loop {
        match file.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                if let Err(e) = out.write_all(&buf[..n]).await {
                    tracing::debug!(path = ?path, error = %e, "Client stopped reading");
                    return;
                }
            }
            Err(e) => {
                tracing::warn!(path = ?path, error = %e, "Read failed mid-stream");
                break;
            }
        }
    }
    if let Err(e) = out.finish().await {
        tracing::debug!(path = ?path, error = %e, "Failed to finish response body");
    }
}

fn whole_seconds(time: SystemTime) -> Option<u64> {
    time.duration_since(UNIX_EPOCH).ok().map(|d| d.as_secs())
}

fn header_value(value: String) -> Result<HeaderValue, FileError> {
    HeaderValue::try_from(value).map_err(|e| FileError::internal("build header", io::Error::other(e)))
}
