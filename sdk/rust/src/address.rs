//! Translation from hfs addresses to HTTP URLs.

/// Scheme for plain HTTP servers.
pub const SCHEME: &str = "hfs://";
/// Scheme for HTTPS servers.
pub const SECURE_SCHEME: &str = "hfss://";

const HTTP: &str = "http://";
const HTTPS: &str = "https://";

/// Rewrite an hfs address into the URL actually requested.
///
/// Anything without an hfs scheme is assumed to be `host[:port]/path` and
/// gets `http://` in front.
pub fn translate(address: &str) -> String {
    if let Some(rest) = address.strip_prefix(SCHEME) {
        format!("{HTTP}{rest}")
    } else if let Some(rest) = address.strip_prefix(SECURE_SCHEME) {
        format!("{HTTPS}{rest}")
    } else {
        format!("{HTTP}{address}")
    }
}

/// A translated address plus whether it needs TLS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteAddress {
    url: String,
}

impl RemoteAddress {
    pub fn new(address: &str) -> Self {
        Self {
            url: translate(address),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_secure(&self) -> bool {
        self.url.starts_with(HTTPS)
    }
}
