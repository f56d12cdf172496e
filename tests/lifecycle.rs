//! Lifecycle scenarios over the in-memory backend with a scripted network
//! fake and a recording control fake.

use async_trait::async_trait;
use bytes::Bytes;
use offcache::host::{HostControl, LifecycleEvent};
use offcache::storage::{CacheStorage, CacheStore, MemoryStorage, StorageError};
use offcache::transport::{Fetcher, NetworkError};
use offcache::{AgentConfig, CacheAgent, CachedResponse, Error, FetchOutcome, Request};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use url::Url;

const ORIGIN: &str = "https://app.test";

fn url(path: &str) -> Url {
    format!("{ORIGIN}{path}").parse().unwrap()
}

/// Scripted network: URL to status/body, anything unlisted is unreachable.
#[derive(Default)]
struct ScriptedFetcher {
    routes: RwLock<HashMap<String, (u16, &'static [u8])>>,
    calls: AtomicUsize,
}

impl ScriptedFetcher {
    fn route(&self, url: &str, status: u16, body: &'static [u8]) {
        self.routes
            .write()
            .unwrap()
            .insert(url.to_string(), (status, body));
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, request: &Request) -> Result<CachedResponse, NetworkError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let routed = self
            .routes
            .read()
            .unwrap()
            .get(request.url.as_str())
            .copied();
        match routed {
            Some((status, body)) => Ok(CachedResponse::new(status, request.url.clone())
                .with_body(Bytes::from_static(body))),
            None => Err(NetworkError::Other(format!(
                "unreachable: {}",
                request.url
            ))),
        }
    }
}

/// Records the control signals the agent sends back to the host.
#[derive(Default)]
struct RecordingControl {
    skipped: AtomicBool,
    claimed: AtomicBool,
}

#[async_trait]
impl HostControl for RecordingControl {
    async fn skip_waiting(&self) -> offcache::Result<()> {
        self.skipped.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn claim_clients(&self) -> offcache::Result<()> {
        self.claimed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// In-memory storage where deleting one poisoned name always fails.
struct FailingDeleteStorage {
    inner: MemoryStorage,
    poison: String,
}

#[async_trait]
impl CacheStorage for FailingDeleteStorage {
    async fn open(&self, name: &str) -> Result<Arc<dyn CacheStore>, StorageError> {
        self.inner.open(name).await
    }

    async fn store_names(&self) -> Result<Vec<String>, StorageError> {
        self.inner.store_names().await
    }

    async fn delete_store(&self, name: &str) -> Result<bool, StorageError> {
        if name == self.poison {
            return Err(StorageError::Unavailable {
                name: name.to_string(),
                reason: "locked".to_string(),
            });
        }
        self.inner.delete_store(name).await
    }
}

struct Harness {
    agent: CacheAgent,
    storage: Arc<MemoryStorage>,
    fetcher: Arc<ScriptedFetcher>,
    control: Arc<RecordingControl>,
}

const MANIFEST: [&str; 3] = ["/", "/offline/", "/static/js/main.js"];

fn config(cache_name: &str) -> AgentConfig {
    AgentConfig::builder(cache_name, ORIGIN.parse().unwrap())
        .with_assets(MANIFEST)
        .with_offline_url("/offline/")
        .build()
        .unwrap()
}

fn harness(cache_name: &str) -> Harness {
    let storage = Arc::new(MemoryStorage::new());
    let fetcher = Arc::new(ScriptedFetcher::default());
    let control = Arc::new(RecordingControl::default());
    let agent = CacheAgent::new(
        config(cache_name),
        storage.clone(),
        fetcher.clone(),
        control.clone(),
    )
    .unwrap();
    Harness {
        agent,
        storage,
        fetcher,
        control,
    }
}

impl Harness {
    fn route_manifest(&self) {
        for path in MANIFEST {
            self.fetcher.route(url(path).as_str(), 200, b"asset");
        }
        self.fetcher.route(url("/offline/").as_str(), 200, b"offline page");
    }

    async fn store_len(&self, name: &str) -> usize {
        self.storage.open(name).await.unwrap().len().await.unwrap()
    }
}

#[tokio::test]
async fn install_precaches_the_whole_manifest() {
    let h = harness("site-v1");
    h.route_manifest();

    let outcome = h.agent.handle(LifecycleEvent::Install).await.unwrap();
    assert!(outcome.is_none());

    assert_eq!(h.store_len("site-v1").await, 3);
    assert!(h.control.skipped.load(Ordering::SeqCst));
}

#[tokio::test]
async fn install_is_atomic_when_an_asset_is_unreachable() {
    let h = harness("site-v1");
    h.fetcher.route(url("/").as_str(), 200, b"home");
    h.fetcher.route(url("/offline/").as_str(), 200, b"offline page");
    // /static/js/main.js is not routed and therefore unreachable.

    let err = h.agent.on_install().await.unwrap_err();
    assert!(matches!(err, Error::Install { .. }));

    // Nothing was committed, not even the store itself.
    assert!(h.storage.store_names().await.unwrap().is_empty());
    assert!(!h.control.skipped.load(Ordering::SeqCst));
}

#[tokio::test]
async fn install_rejects_assets_with_error_status() {
    let h = harness("site-v1");
    h.route_manifest();
    h.fetcher.route(url("/static/js/main.js").as_str(), 404, b"not found");

    let err = h.agent.on_install().await.unwrap_err();
    assert!(matches!(err, Error::Install { .. }));
    assert!(h.storage.store_names().await.unwrap().is_empty());
}

#[tokio::test]
async fn cached_requests_never_touch_the_network() {
    let h = harness("site-v1");
    h.route_manifest();
    h.agent.on_install().await.unwrap();
    let calls_after_install = h.fetcher.calls();

    let outcome = h.agent.on_fetch(&Request::get(url("/"))).await.unwrap();
    let FetchOutcome::Hit(response) = outcome else {
        panic!("expected a cache hit");
    };
    assert_eq!(response.body().as_ref(), b"asset");
    assert_eq!(h.fetcher.calls(), calls_after_install);
}

#[tokio::test]
async fn a_miss_populates_the_cache_for_the_next_request() {
    let h = harness("site-v1");
    h.route_manifest();
    h.agent.on_install().await.unwrap();
    h.fetcher.route(url("/api/data").as_str(), 200, b"{\"ok\":true}");
    let calls_after_install = h.fetcher.calls();

    let first = h.agent.on_fetch(&Request::get(url("/api/data"))).await.unwrap();
    assert!(matches!(first, FetchOutcome::Network(_)));

    let second = h.agent.on_fetch(&Request::get(url("/api/data"))).await.unwrap();
    assert!(matches!(second, FetchOutcome::Hit(_)));
    assert_eq!(h.fetcher.calls(), calls_after_install + 1);
}

#[tokio::test]
async fn cross_origin_responses_are_never_cached() {
    let h = harness("site-v1");
    h.route_manifest();
    h.agent.on_install().await.unwrap();
    h.fetcher.route("https://cdn.test/lib.js", 200, b"lib");

    let request = Request::get("https://cdn.test/lib.js".parse().unwrap());
    let first = h.agent.on_fetch(&request).await.unwrap();
    assert!(matches!(first, FetchOutcome::Network(_)));

    // A second request goes to the network again; the store gained nothing.
    let second = h.agent.on_fetch(&request).await.unwrap();
    assert!(matches!(second, FetchOutcome::Network(_)));
    assert_eq!(h.store_len("site-v1").await, 3);
}

#[tokio::test]
async fn error_status_responses_are_returned_but_not_cached() {
    let h = harness("site-v1");
    h.route_manifest();
    h.agent.on_install().await.unwrap();
    h.fetcher.route(url("/missing").as_str(), 404, b"not found");
    let calls_after_install = h.fetcher.calls();

    let request = Request::get(url("/missing"));
    let outcome = h.agent.on_fetch(&request).await.unwrap();
    let FetchOutcome::Network(response) = outcome else {
        panic!("expected a network response");
    };
    assert_eq!(response.status(), 404);

    h.agent.on_fetch(&request).await.unwrap();
    assert_eq!(h.fetcher.calls(), calls_after_install + 2);
}

#[tokio::test]
async fn non_get_requests_pass_straight_through() {
    let h = harness("site-v1");
    let request = Request::new(
        offcache::Method::Post,
        url("/api/submit"),
        offcache::RequestMode::Subresource,
    );

    let outcome = h
        .agent
        .handle(LifecycleEvent::Fetch(request))
        .await
        .unwrap()
        .unwrap();
    assert!(outcome.is_passthrough());

    // Neither a network call nor a cache read or write happened.
    assert_eq!(h.fetcher.calls(), 0);
    assert!(h.storage.store_names().await.unwrap().is_empty());
}

#[tokio::test]
async fn offline_navigation_gets_the_fallback_page() {
    let h = harness("site-v1");
    h.route_manifest();
    h.agent.on_install().await.unwrap();

    let outcome = h
        .agent
        .on_fetch(&Request::navigate(url("/some/deep/page")))
        .await
        .unwrap();
    let FetchOutcome::Offline(response) = outcome else {
        panic!("expected the offline fallback");
    };
    assert_eq!(response.body().as_ref(), b"offline page");
}

#[tokio::test]
async fn offline_subresource_propagates_the_network_error() {
    let h = harness("site-v1");
    h.route_manifest();
    h.agent.on_install().await.unwrap();

    let err = h
        .agent
        .on_fetch(&Request::get(url("/img/banner.png")))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Network(_)));
}

#[tokio::test]
async fn missing_fallback_is_a_distinct_error() {
    // No install ran, so the store holds no offline page.
    let h = harness("site-v1");

    let err = h
        .agent
        .on_fetch(&Request::navigate(url("/anywhere")))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::OfflineFallbackMissing { .. }));
}

#[tokio::test]
async fn activate_sweeps_every_stale_store() {
    let h = harness("site-v2");
    h.route_manifest();
    h.storage.open("site-v1").await.unwrap();
    h.storage.open("site-v0").await.unwrap();

    h.agent.on_install().await.unwrap();
    let outcome = h.agent.handle(LifecycleEvent::Activate).await.unwrap();
    assert!(outcome.is_none());

    assert_eq!(
        h.storage.store_names().await.unwrap(),
        vec!["site-v2".to_string()]
    );
    assert!(h.control.claimed.load(Ordering::SeqCst));
}

#[tokio::test]
async fn a_failed_deletion_does_not_block_the_others() {
    let storage = Arc::new(FailingDeleteStorage {
        inner: MemoryStorage::new(),
        poison: "site-v0".to_string(),
    });
    let fetcher = Arc::new(ScriptedFetcher::default());
    let control = Arc::new(RecordingControl::default());
    let agent = CacheAgent::new(
        config("site-v2"),
        storage.clone(),
        fetcher.clone(),
        control.clone(),
    )
    .unwrap();

    storage.open("site-v0").await.unwrap();
    storage.open("site-v1").await.unwrap();
    storage.open("site-v2").await.unwrap();

    // Best-effort cleanup: activation still completes and claims clients.
    agent.on_activate().await.unwrap();

    let mut names = storage.store_names().await.unwrap();
    names.sort();
    assert_eq!(names, vec!["site-v0".to_string(), "site-v2".to_string()]);
    assert!(control.claimed.load(Ordering::SeqCst));
}
