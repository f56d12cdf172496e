//! Minimal end-to-end demo: install a precache against a live site, then
//! answer a request cache-first.
//!
//! Run with: `cargo run --example offline_demo`

use offcache::host::NullControl;
use offcache::storage::MemoryStorage;
use offcache::transport::HttpFetcher;
use offcache::{AgentConfig, CacheAgent, FetchOutcome, LifecycleEvent, Request};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> offcache::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let origin: url::Url = "https://example.com".parse().unwrap();
    let config = AgentConfig::builder("demo-cache-v1", origin.clone())
        .with_asset("/")
        .with_offline_url("/")
        .build()?;

    let agent = CacheAgent::new(
        config,
        Arc::new(MemoryStorage::new()),
        Arc::new(HttpFetcher::new()?),
        Arc::new(NullControl),
    )?;

    agent.handle(LifecycleEvent::Install).await?;
    agent.handle(LifecycleEvent::Activate).await?;

    // The homepage was precached, so this never goes back to the network.
    let outcome = agent.on_fetch(&Request::navigate(origin)).await?;
    match outcome {
        FetchOutcome::Hit(response) => {
            println!("cache hit: {} bytes from {}", response.body().len(), response.url());
        }
        other => println!("unexpected outcome: {other:?}"),
    }
    Ok(())
}
