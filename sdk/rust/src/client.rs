use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use reqwest::header::{ACCEPT_ENCODING, CONTENT_ENCODING};
use reqwest::{Client, Response, StatusCode};

use crate::address::RemoteAddress;
use crate::error::ClientError;

const GZIP: &str = "gzip";

/// Handle to one remote file.
///
/// The address is translated once when the handle is made. Every read or
/// write is a single request; nothing is buffered between calls.
#[derive(Debug)]
pub struct RemoteFile {
    address: RemoteAddress,
    client: Client,
    closed: bool,
}

/// Open a handle for reading.
pub fn open(address: &str) -> Result<RemoteFile, ClientError> {
    RemoteFile::new(address)
}

/// Open a handle for writing. The remote file is only touched on `write`.
pub fn create(address: &str) -> Result<RemoteFile, ClientError> {
    RemoteFile::new(address)
}

/// Delete a remote file.
pub async fn remove(address: &str) -> Result<(), ClientError> {
    let address = RemoteAddress::new(address);
    let response = http_client(&address)?
        .delete(address.url())
        .send()
        .await?;
    check_status(address.url(), response)?;
    Ok(())
}

impl RemoteFile {
    fn new(address: &str) -> Result<Self, ClientError> {
        let address = RemoteAddress::new(address);
        let client = http_client(&address)?;
        Ok(Self {
            address,
            client,
            closed: false,
        })
    }

    pub fn address(&self) -> &RemoteAddress {
        &self.address
    }

    /// Fetch the whole file, gunzipping the body.
    pub async fn read_to_end(&self) -> Result<Vec<u8>, ClientError> {
        self.ensure_open()?;
        let url = self.address.url();

        let response = self
            .client
            .get(url)
            .header(ACCEPT_ENCODING, GZIP)
            .send()
            .await?;
        let response = check_status(url, response)?;

        let encoding = response
            .headers()
            .get(CONTENT_ENCODING)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let compressed = response.bytes().await?;

        let mut body = Vec::new();
        GzDecoder::new(compressed.as_ref())
            .read_to_end(&mut body)
            .map_err(|source| ClientError::Protocol {
                url: url.to_string(),
                encoding,
                source,
            })?;

        tracing::debug!(url, bytes = body.len(), "Read remote file");
        Ok(body)
    }

    /// Replace the remote file with `data`, sent gzip-compressed.
    pub async fn write(&self, data: &[u8]) -> Result<usize, ClientError> {
        self.ensure_open()?;
        let url = self.address.url();

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data)?;
        let payload = encoder.finish()?;

        let response = self
            .client
            .post(url)
            .header(CONTENT_ENCODING, GZIP)
            .body(payload)
            .send()
            .await?;
        check_status(url, response)?;

        tracing::debug!(url, bytes = data.len(), "Wrote remote file");
        Ok(data.len())
    }

    /// Close the handle. Closing twice is an error.
    pub fn close(&mut self) -> Result<(), ClientError> {
        self.ensure_open()?;
        self.closed = true;
        Ok(())
    }

    fn ensure_open(&self) -> Result<(), ClientError> {
        if self.closed {
            Err(ClientError::InvalidArgument("file already closed"))
        } else {
            Ok(())
        }
    }
}

/// Plain client for `hfs://`; `hfss://` skips certificate verification.
fn http_client(address: &RemoteAddress) -> Result<Client, ClientError> {
    let client = Client::builder()
        .danger_accept_invalid_certs(address.is_secure())
        .build()?;
    Ok(client)
}

fn check_status(url: &str, response: Response) -> Result<Response, ClientError> {
    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::NOT_FOUND => Err(ClientError::NotFound {
            url: url.to_string(),
        }),
        status => Err(ClientError::Status {
            url: url.to_string(),
            status,
        }),
    }
}
