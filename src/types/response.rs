//! Immutable response values.

use bytes::Bytes;
use url::Url;

/// A response payload as it travels between the network, the cache store, and
/// the caller.
///
/// Unlike a streaming network response, this is an immutable value: the body
/// is a refcounted [`Bytes`] buffer, so cloning is cheap and one response can
/// be returned to the caller while a copy is written to the cache with no
/// single-consumption hazard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: Bytes,
    url: Url,
}

impl CachedResponse {
    pub fn new(status: u16, url: Url) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Bytes::new(),
            url,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// First header value with the given name, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
