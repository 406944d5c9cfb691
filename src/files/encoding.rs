//! Transfer codings: negotiation plus the encoding/decoding stream wrappers.
//!
//! `deflate` is the zlib-wrapped stream, which is what HTTP means by it.

use std::io;

use async_compression::tokio::bufread::{GzipDecoder, ZlibDecoder};
use async_compression::tokio::write::{GzipEncoder, ZlibEncoder};
use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt};

/// A compression envelope understood on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentCoding {
    Gzip,
    Deflate,
}

impl ContentCoding {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Deflate => "deflate",
        }
    }

    /// Pick a response coding from an `Accept-Encoding` value.
    ///
    /// gzip wins over deflate whatever order the client lists them in.
    /// Parameters are ignored except `q=0`, which rules a coding out.
    pub fn negotiate(accept_encoding: &str) -> Option<Self> {
        let offered: Vec<&str> = accept_encoding
            .split(',')
            .filter_map(acceptable_coding)
            .collect();

        [Self::Gzip, Self::Deflate].into_iter().find(|coding| {
            offered
                .iter()
                .any(|name| name.eq_ignore_ascii_case(coding.as_str()))
        })
    }

    /// Interpret a request `Content-Encoding` value. Anything unknown is
    /// treated as identity.
    pub fn from_content_encoding(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("gzip") {
            Some(Self::Gzip)
        } else if value.eq_ignore_ascii_case("deflate") {
            Some(Self::Deflate)
        } else {
            None
        }
    }
}

fn acceptable_coding(token: &str) -> Option<&str> {
    let mut parts = token.split(';');
    let name = parts.next()?.trim();
    let refused = parts.any(|param| {
        param
            .trim()
            .strip_prefix("q=")
            .and_then(|q| q.trim().parse::<f32>().ok())
            .is_some_and(|q| q <= 0.0)
    });
    (!name.is_empty() && !refused).then_some(name)
}

/// Output side of a response body, selected once at negotiation time.
pub enum ResponseWriter<W> {
    Plain(W),
    Gzip(GzipEncoder<W>),
    Deflate(ZlibEncoder<W>),
}

impl<W: AsyncWrite + Unpin> ResponseWriter<W> {
    pub fn new(inner: W, coding: Option<ContentCoding>) -> Self {
        match coding {
            None => Self::Plain(inner),
            Some(ContentCoding::Gzip) => Self::Gzip(GzipEncoder::new(inner)),
            Some(ContentCoding::Deflate) => Self::Deflate(ZlibEncoder::new(inner)),
        }
    }

    pub async fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        match self {
            Self::Plain(w) => w.write_all(buf).await,
            Self::Gzip(w) => w.write_all(buf).await,
            Self::Deflate(w) => w.write_all(buf).await,
        }
    }

    /// Emit trailing codec frames and close the underlying writer.
    pub async fn finish(self) -> io::Result<()> {
        match self {
            Self::Plain(mut w) => w.shutdown().await,
            Self::Gzip(mut w) => w.shutdown().await,
            Self::Deflate(mut w) => w.shutdown().await,
        }
    }
}

/// Input side of an upload body.
pub enum BodyReader<R> {
    Plain(R),
    Gzip(GzipDecoder<R>),
    Deflate(ZlibDecoder<R>),
}

impl<R: AsyncBufRead + Unpin> BodyReader<R> {
    pub fn new(inner: R, coding: Option<ContentCoding>) -> Self {
        match coding {
            None => Self::Plain(inner),
            Some(ContentCoding::Gzip) => Self::Gzip(GzipDecoder::new(inner)),
            Some(ContentCoding::Deflate) => Self::Deflate(ZlibDecoder::new(inner)),
        }
    }

    /// Copy the decoded bytes into `out`, returning how many were written.
    pub async fn copy_to<W>(self, out: &mut W) -> io::Result<u64>
    where
        W: AsyncWrite + Unpin + ?Sized,
    {
        match self {
            Self::Plain(mut r) => tokio::io::copy(&mut r, out).await,
            Self::Gzip(mut r) => tokio::io::copy(&mut r, out).await,
            Self::Deflate(mut r) => tokio::io::copy(&mut r, out).await,
        }
    }
}
