use crate::transport::{Fetcher, NetworkError};
use crate::types::{CachedResponse, Method, Request};
use async_trait::async_trait;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Network fetcher backed by a shared reqwest client.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, NetworkError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, NetworkError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(NetworkError::Http)?;
        Ok(Self { client })
    }

    /// Wraps a preconfigured client (proxy, pool tuning, and so on).
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Head => reqwest::Method::HEAD,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
        Method::Options => reqwest::Method::OPTIONS,
        Method::Patch => reqwest::Method::PATCH,
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &Request) -> Result<CachedResponse, NetworkError> {
        let response = self
            .client
            .request(reqwest_method(request.method), request.url.clone())
            .send()
            .await?;

        let status = response.status().as_u16();
        let url = response.url().clone();

        let mut cached = CachedResponse::new(status, url);
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                cached = cached.with_header(name.as_str(), value);
            }
        }

        let body = response.bytes().await?;
        Ok(cached.with_body(body))
    }
}
