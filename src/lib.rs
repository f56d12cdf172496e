//! # offcache
//!
//! Offline-first cache agent runtime: a cache-first request interception layer
//! with atomic precaching and an offline fallback page.
//!
//! ## Overview
//!
//! This library implements the cache-management side of an offline-capable web
//! application as a reusable runtime. A [`CacheAgent`] is registered with a
//! host runtime and reacts to three lifecycle signals:
//!
//! - **install** — precache a fixed asset manifest into a version-named store,
//!   all-or-nothing, then ask the host to promote this version immediately
//! - **activate** — delete every store whose name is not the current version
//!   tag, then take control of all open pages
//! - **fetch** — answer intercepted `GET` requests cache-first, falling back to
//!   the network, and substituting the offline page for failed navigations
//!
//! The host-managed pieces (the cache registry, the network, the control
//! channel back to the host) are modeled as injected trait objects rather than
//! ambient globals, so every one of them can be faked in tests.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`CacheAgent`] | The cache manager: install, activate, and fetch handlers |
//! | [`AgentConfig`] | Version tag, asset manifest, offline fallback, own origin |
//! | [`FetchOutcome`] | How an intercepted request was answered |
//! | [`storage::CacheStorage`] | Trait for the host cache registry (open/list/delete) |
//! | [`transport::Fetcher`] | Trait for outbound network fetches |
//! | [`host::HostControl`] | Trait for skip-waiting / claim-clients control signals |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use offcache::host::NullControl;
//! use offcache::storage::MemoryStorage;
//! use offcache::transport::HttpFetcher;
//! use offcache::{AgentConfig, CacheAgent, LifecycleEvent};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> offcache::Result<()> {
//!     let config = AgentConfig::builder("site-cache-v1", "https://example.com".parse().unwrap())
//!         .with_assets(["/", "/offline/", "/static/js/main.js"])
//!         .with_offline_url("/offline/")
//!         .build()?;
//!
//!     let agent = CacheAgent::new(
//!         config,
//!         Arc::new(MemoryStorage::new()),
//!         Arc::new(HttpFetcher::new()?),
//!         Arc::new(NullControl),
//!     )?;
//!
//!     agent.handle(LifecycleEvent::Install).await?;
//!     agent.handle(LifecycleEvent::Activate).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`agent`] | The cache manager and its configuration |
//! | [`host`] | Lifecycle signals and the outbound control interface |
//! | [`storage`] | Cache registry and store traits with an in-memory backend |
//! | [`transport`] | Outbound network interface backed by reqwest |
//! | [`types`] | Request descriptors and immutable response values |

pub mod agent;
pub mod host;
pub mod storage;
pub mod transport;
pub mod types;

// Re-export main types for convenience
pub use agent::{AgentConfig, AgentConfigBuilder, CacheAgent, FetchOutcome};
pub use host::LifecycleEvent;
pub use types::{CachedResponse, Method, Request, RequestMode};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::Error;
