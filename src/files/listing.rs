//! Directory listings.
//!
//! A directory holding an `index.html` is served as that page, provided it
//! resolves inside the root to a regular file. Otherwise an HTML listing is generated fresh for every request; hidden entries are
//! skipped and both sections are sorted by name.

use std::fmt::{self, Write};
use std::io;
use std::path::Path;

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

use crate::error::{FileError, ACCESS_FORBIDDEN};
use crate::files::{EntryKind, FileService, RequestContext};

const INDEX_DOCUMENT: &str = "index.html";

/// Characters escaped when a file name becomes a relative link.
const LINK_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'\'')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

impl FileService {
    pub(crate) async fn list_directory(
        &self,
        dir: &Path,
        ctx: &RequestContext<'_>,
    ) -> Result<Response, FileError> {
        let mut entries = tokio::fs::read_dir(dir)
            .await
            .map_err(|e| FileError::internal("read directory", e))?;

        let mut names = Vec::new();
        let mut has_index = false;
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| FileError::internal("read directory", e))?
        {
            // Follow symlinks so a linked directory is listed as one.
            let is_dir = tokio::fs::metadata(entry.path())
                .await
                .map(|metadata| metadata.is_dir())
                .unwrap_or(false);
            let name = entry.file_name().to_string_lossy().into_owned();
            if name == INDEX_DOCUMENT && !is_dir {
                has_index = true;
            }
            names.push((name, is_dir));
        }

        if has_index {
            return self.send_index(&dir.join(INDEX_DOCUMENT), ctx).await;
        }

        let (dirs, files) = partition_entries(names);
        let title = percent_decode_str(ctx.path).decode_utf8_lossy();
        let listing = DirectoryListing {
            title: &title,
            dirs: &dirs,
            files: &files,
            server: &self.config().app_name,
        };
        let html = listing
            .render()
            .map_err(|e| FileError::internal("render directory listing", io::Error::other(e)))?;

        tracing::debug!(
            dir = ?dir,
            dirs = dirs.len(),
            files = files.len(),
            "Rendered directory listing"
        );

        Ok((
            StatusCode::OK,
            [(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/html; charset=utf-8"),
            )],
            html,
        )
            .into_response())
    }

    /// Serve the index document under the same rules as a direct GET: it
    /// must stay inside the root and be a regular file before it is opened.
    async fn send_index(
        &self,
        index: &Path,
        ctx: &RequestContext<'_>,
    ) -> Result<Response, FileError> {
        self.resolver().ensure_contained(index).await?;

        let metadata = tokio::fs::metadata(index)
            .await
            .map_err(|e| FileError::not_found(index, e))?;
        match EntryKind::of(metadata.file_type()) {
            EntryKind::File => self.send_file(index, ctx).await,
            _ => Err(FileError::forbidden(index, ACCESS_FORBIDDEN)),
        }
    }
}

/// Split `(name, is_dir)` pairs into sorted directory and file names,
/// dropping dot-prefixed entries.
pub fn partition_entries(entries: Vec<(String, bool)>) -> (Vec<String>, Vec<String>) {
    let (mut dirs, mut files): (Vec<_>, Vec<_>) = entries
        .into_iter()
        .filter(|(name, _)| !name.starts_with('.'))
        .partition(|(_, is_dir)| *is_dir);
    dirs.sort();
    files.sort();
    (
        dirs.into_iter().map(|(name, _)| name).collect(),
        files.into_iter().map(|(name, _)| name).collect(),
    )
}

/// View model for the generated listing page.
#[derive(Debug)]
pub struct DirectoryListing<'a> {
    pub title: &'a str,
    pub dirs: &'a [String],
    pub files: &'a [String],
    pub server: &'a str,
}

impl DirectoryListing<'_> {
    pub fn render(&self) -> Result<String, fmt::Error> {
        let mut out = String::with_capacity(2048);
        let title = Escaped(self.title);

        writeln!(out, "<!DOCTYPE html>")?;
        writeln!(out, "<html lang=\"en\">")?;
        writeln!(out, "<head>")?;
        writeln!(out, "<meta charset=\"utf-8\">")?;
        writeln!(out, "<title>Index of {title}</title>")?;
        writeln!(out, "<style>{STYLE}</style>")?;
        writeln!(out, "</head>")?;
        writeln!(out, "<body>")?;
        writeln!(out, "<h2>Index of {title}</h2>")?;
        writeln!(out, "<div class=\"list\">")?;
        writeln!(out, "<table>")?;
        writeln!(
            out,
            "<thead><tr><th>Name</th><th>Type</th><th>Options</th></tr></thead>"
        )?;
        writeln!(out, "<tbody>")?;
        writeln!(
            out,
            "<tr><td><a href=\"../\">Parent Directory</a>/</td><td>Directory</td><td></td></tr>"
        )?;
        for dir in self.dirs {
            let link = utf8_percent_encode(dir, LINK_SEGMENT);
            writeln!(
                out,
                "<tr><td><a href=\"{link}/\">{}/</a></td><td>Directory</td><td></td></tr>",
                Escaped(dir)
            )?;
        }
        for file in self.files {
            let link = utf8_percent_encode(file, LINK_SEGMENT);
            writeln!(
                out,
                "<tr><td><a href=\"{link}\">{}</a></td><td>&nbsp;</td><td><a href=\"{link}?dl\">Download</a></td></tr>",
                Escaped(file)
            )?;
        }
        writeln!(out, "</tbody>")?;
        writeln!(out, "</table>")?;
        writeln!(out, "</div>")?;
        writeln!(out, "<div class=\"foot\">{}</div>", Escaped(self.server))?;
        writeln!(out, "</body>")?;
        write!(out, "</html>")?;
        Ok(out)
    }
}

const STYLE: &str = "a{text-decoration:none;color:blue}\
a:visited{color:#48468F}\
a:hover{text-decoration:underline;color:red}\
body{background-color:#F5F5F5}\
table{margin-left:12px}\
th,td{font:90% monospace;text-align:left;padding-right:14px}\
div.list{background-color:white;border-top:1px solid #646464;border-bottom:1px solid #646464;padding:10px 0 14px}\
div.foot{font:90% monospace;color:#787878;padding-top:4px}";

/// HTML-escapes text on display.
struct Escaped<'a>(&'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.chars() {
            match c {
                '&' => f.write_str("&amp;")?,
                '<' => f.write_str("&lt;")?,
                '>' => f.write_str("&gt;")?,
                '"' => f.write_str("&quot;")?,
                '\'' => f.write_str("&#39;")?,
                c => f.write_char(c)?,
            }
        }
        Ok(())
    }
}
