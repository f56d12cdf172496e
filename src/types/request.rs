//! Intercepted request descriptors.

use std::fmt;
use url::Url;

/// HTTP request method.
///
/// Only `GET` requests participate in caching; every other method passes
/// straight through to default network handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Options,
    Patch,
}

impl Method {
    pub fn is_get(self) -> bool {
        matches!(self, Self::Get)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Options => "OPTIONS",
            Self::Patch => "PATCH",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Navigation mode of an intercepted request.
///
/// Only top-level page navigations receive the offline fallback when the
/// network is unreachable; subresource loads fail like any other request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestMode {
    /// A top-level page navigation.
    Navigate,
    /// Anything else: images, scripts, stylesheets, API calls.
    Subresource,
}

impl RequestMode {
    pub fn is_navigation(self) -> bool {
        matches!(self, Self::Navigate)
    }
}

/// An intercepted request descriptor: method, absolute URL, navigation mode.
///
/// Cache identity is method + URL; the navigation mode only influences how a
/// network failure is answered.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub mode: RequestMode,
}

impl Request {
    pub fn new(method: Method, url: Url, mode: RequestMode) -> Self {
        Self { method, url, mode }
    }

    /// A plain `GET` subresource request.
    pub fn get(url: Url) -> Self {
        Self::new(Method::Get, url, RequestMode::Subresource)
    }

    /// A `GET` request in navigation mode.
    pub fn navigate(url: Url) -> Self {
        Self::new(Method::Get, url, RequestMode::Navigate)
    }

    pub fn with_mode(mut self, mode: RequestMode) -> Self {
        self.mode = mode;
        self
    }

    /// Canonical cache identity for this request.
    pub fn cache_key(&self) -> String {
        format!("{} {}", self.method, self.url)
    }

    /// Whether this request targets the given origin.
    pub fn is_same_origin(&self, origin: &Url) -> bool {
        self.url.origin() == origin.origin()
    }
}
