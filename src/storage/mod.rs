//! # Cache Storage Module
//!
//! This module models the host cache registry as an explicit, injected service
//! instead of an ambient global, so it can be faked in tests and swapped for a
//! persistent backend without touching the agent.
//!
//! ## Key Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`CacheStorage`] | The registry: open-or-create, list, and delete named stores |
//! | [`CacheStore`] | One named store: lookup, put, and atomic batch commit |
//! | [`MemoryStorage`] | In-memory registry, the default backend and test double |
//! | [`StorageError`] | Typed backend failures |
//!
//! ## Store lifecycle
//!
//! A store is created on first `open` and lives until `delete_store` removes
//! it. Store names carry the version tag, so replacing the tag orphans the old
//! store; the agent's activate handler sweeps orphans out of the registry.

mod backend;

pub use backend::{CacheStorage, CacheStore, MemoryStorage, MemoryStore, StorageError};
