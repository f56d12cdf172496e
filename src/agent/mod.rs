//! # Cache Agent Module
//!
//! The cache manager: one reactive component that owns a version-named store
//! and answers the host's three lifecycle signals.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`CacheAgent`] | Install, activate, and fetch handlers |
//! | [`AgentConfig`] | Version tag, asset manifest, offline fallback, origin |
//! | [`FetchOutcome`] | How an intercepted request was answered |
//!
//! ## Decision algorithm for fetch
//!
//! Cache-first with network fallback and offline fallback:
//!
//! 1. non-`GET` requests pass straight through, untouched
//! 2. a cached match is returned immediately, with no freshness check
//! 3. on a miss the request goes to the network; same-origin successes are
//!    copied into the store before the response is returned
//! 4. if the network fails, navigations get the precached offline page and
//!    subresource loads get the network error

mod config;

pub use config::{AgentConfig, AgentConfigBuilder};

use crate::host::{HostControl, LifecycleEvent};
use crate::storage::{CacheStorage, CacheStore};
use crate::transport::{Fetcher, NetworkError};
use crate::types::{CachedResponse, Request};
use crate::{Error, Result};
use futures::future::{join_all, try_join_all};
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// Outcome of handling an intercepted request.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// Served from the cache store; the network was never touched.
    Hit(CachedResponse),
    /// Served from the network (and copied into the store when same-origin).
    Network(CachedResponse),
    /// The network failed on a navigation; the offline page was substituted.
    Offline(CachedResponse),
    /// Non-`GET` request, left to default network handling.
    Passthrough,
}

impl FetchOutcome {
    /// The response carried by this outcome, if any.
    pub fn response(&self) -> Option<&CachedResponse> {
        match self {
            Self::Hit(r) | Self::Network(r) | Self::Offline(r) => Some(r),
            Self::Passthrough => None,
        }
    }

    pub fn is_passthrough(&self) -> bool {
        matches!(self, Self::Passthrough)
    }
}

/// The cache manager.
///
/// Owns nothing but its configuration; the cache registry, the network, and
/// the host control channel are injected so each can be faked independently.
pub struct CacheAgent {
    config: AgentConfig,
    storage: Arc<dyn CacheStorage>,
    fetcher: Arc<dyn Fetcher>,
    control: Arc<dyn HostControl>,
}

impl CacheAgent {
    pub fn new(
        config: AgentConfig,
        storage: Arc<dyn CacheStorage>,
        fetcher: Arc<dyn Fetcher>,
        control: Arc<dyn HostControl>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            storage,
            fetcher,
            control,
        })
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Dispatches a host lifecycle signal to its handler.
    ///
    /// The returned future covers the handler's full asynchronous extent; the
    /// host must await it before considering the event handled.
    pub async fn handle(&self, event: LifecycleEvent) -> Result<Option<FetchOutcome>> {
        match event {
            LifecycleEvent::Install => self.on_install().await.map(|()| None),
            LifecycleEvent::Activate => self.on_activate().await.map(|()| None),
            LifecycleEvent::Fetch(request) => self.on_fetch(&request).await.map(Some),
        }
    }

    /// Install handler: precache the asset manifest, all-or-nothing, then ask
    /// the host to promote this version immediately.
    ///
    /// Every manifest URL must fetch with a success status. Any failure
    /// rejects the whole install and commits nothing; the host retries on its
    /// own schedule (typically the next page load).
    pub async fn on_install(&self) -> Result<()> {
        let assets = self.config.asset_urls()?;
        let batch = try_join_all(assets.into_iter().map(|url| self.precache_asset(url))).await?;

        let store = self.storage.open(&self.config.cache_name).await?;
        let count = batch.len();
        store.put_all(batch).await?;
        info!(
            cache = %self.config.cache_name,
            assets = count,
            "precache installed"
        );

        self.control.skip_waiting().await
    }

    async fn precache_asset(&self, url: Url) -> Result<(Request, CachedResponse)> {
        let request = Request::get(url);
        let response = self
            .fetcher
            .fetch(&request)
            .await
            .map_err(|source| Error::Install {
                url: request.url.to_string(),
                source,
            })?;
        if !response.is_success() {
            return Err(Error::Install {
                url: request.url.to_string(),
                source: NetworkError::Status {
                    status: response.status(),
                    url: request.url.to_string(),
                },
            });
        }
        Ok((request, response))
    }

    /// Activate handler: sweep every store whose name is not the current
    /// version tag, then take control of all open pages.
    ///
    /// Deletions run concurrently and independently; one failing store never
    /// blocks the others. Cleanup is best-effort, so a failed deletion is
    /// logged rather than surfaced.
    pub async fn on_activate(&self) -> Result<()> {
        let stale: Vec<String> = self
            .storage
            .store_names()
            .await?
            .into_iter()
            .filter(|name| *name != self.config.cache_name)
            .collect();

        let deletions = stale.into_iter().map(|name| {
            let storage = Arc::clone(&self.storage);
            async move {
                let result = storage.delete_store(&name).await;
                (name, result)
            }
        });
        for (name, result) in join_all(deletions).await {
            match result {
                Ok(_) => debug!(store = %name, "stale store removed"),
                Err(err) => warn!(store = %name, %err, "failed to remove stale store"),
            }
        }
        info!(cache = %self.config.cache_name, "activated");

        self.control.claim_clients().await
    }

    /// Fetch handler: cache-first with network fallback and offline fallback.
    pub async fn on_fetch(&self, request: &Request) -> Result<FetchOutcome> {
        if !request.method.is_get() {
            return Ok(FetchOutcome::Passthrough);
        }

        let store = self.storage.open(&self.config.cache_name).await?;
        if let Some(cached) = store.lookup(request).await? {
            debug!(url = %request.url, "cache hit");
            return Ok(FetchOutcome::Hit(cached));
        }

        match self.fetcher.fetch(request).await {
            Ok(response) => {
                self.cache_if_eligible(store.as_ref(), request, &response)
                    .await;
                Ok(FetchOutcome::Network(response))
            }
            Err(err) if request.mode.is_navigation() => {
                debug!(url = %request.url, %err, "network failed, serving offline fallback");
                self.offline_fallback(store.as_ref()).await
            }
            Err(err) => Err(Error::Network(err)),
        }
    }

    /// Copies a network response into the store. Cross-origin responses are
    /// never cached; a write failure degrades to a log line because the
    /// caller's copy of the response does not depend on it.
    async fn cache_if_eligible(
        &self,
        store: &dyn CacheStore,
        request: &Request,
        response: &CachedResponse,
    ) {
        if !request.is_same_origin(&self.config.origin) {
            debug!(url = %request.url, "cross-origin response not cached");
            return;
        }
        if !response.is_success() {
            return;
        }
        if let Err(err) = store.put(request, response).await {
            warn!(url = %request.url, %err, "cache write failed");
        }
    }

    async fn offline_fallback(&self, store: &dyn CacheStore) -> Result<FetchOutcome> {
        let fallback = self.config.offline_request()?;
        store
            .lookup(&fallback)
            .await?
            .map(FetchOutcome::Offline)
            .ok_or_else(|| Error::OfflineFallbackMissing {
                url: self.config.offline_url.clone(),
            })
    }
}
