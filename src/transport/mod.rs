//! Outbound network interface.
//!
//! The agent never talks to the network directly; it goes through the
//! [`Fetcher`] trait so tests can script responses. [`HttpFetcher`] is the
//! production implementation on top of reqwest.

mod http;

pub use http::HttpFetcher;

use crate::types::{CachedResponse, Request};
use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("network error: {0}")]
    Other(String),
}

/// Issues requests over the network with plain request/response semantics.
///
/// No custom headers are added. A completed HTTP exchange is `Ok` whatever its
/// status code; `Err` means the exchange itself failed (no connectivity, DNS
/// failure, timeout).
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, request: &Request) -> Result<CachedResponse, NetworkError>;
}
