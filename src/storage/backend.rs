//! Storage backend traits and the in-memory implementation.

use crate::types::{CachedResponse, Request};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Errors surfaced by the cache storage subsystem.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("store {name:?} is unavailable: {reason}")]
    Unavailable { name: String, reason: String },

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// One named store: request identity mapped to a response payload.
///
/// The backend must apply `put`, `put_all`, and `lookup` atomically with
/// respect to each other; callers do no locking of their own.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns the cached response matching the request's cache identity.
    async fn lookup(&self, request: &Request) -> Result<Option<CachedResponse>, StorageError>;

    /// Stores a response keyed by the request, replacing any previous entry.
    async fn put(&self, request: &Request, response: &CachedResponse) -> Result<(), StorageError>;

    /// Commits every entry in the batch or none of them.
    async fn put_all(
        &self,
        entries: Vec<(Request, CachedResponse)>,
    ) -> Result<(), StorageError>;

    async fn len(&self) -> Result<usize, StorageError>;
}

/// The cache registry: a namespace of named stores.
#[async_trait]
pub trait CacheStorage: Send + Sync {
    /// Opens the named store, creating it if absent.
    async fn open(&self, name: &str) -> Result<Arc<dyn CacheStore>, StorageError>;

    /// Names of every store currently in the registry.
    async fn store_names(&self) -> Result<Vec<String>, StorageError>;

    /// Deletes the named store. Returns whether it existed.
    async fn delete_store(&self, name: &str) -> Result<bool, StorageError>;
}

/// In-memory store keyed by the request's cache identity.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, CachedResponse>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn lookup(&self, request: &Request) -> Result<Option<CachedResponse>, StorageError> {
        Ok(self.entries.read().unwrap().get(&request.cache_key()).cloned())
    }

    async fn put(&self, request: &Request, response: &CachedResponse) -> Result<(), StorageError> {
        self.entries
            .write()
            .unwrap()
            .insert(request.cache_key(), response.clone());
        Ok(())
    }

    async fn put_all(
        &self,
        entries: Vec<(Request, CachedResponse)>,
    ) -> Result<(), StorageError> {
        // Single write-lock section keeps the batch all-or-nothing.
        let mut map = self.entries.write().unwrap();
        for (request, response) in entries {
            map.insert(request.cache_key(), response);
        }
        Ok(())
    }

    async fn len(&self) -> Result<usize, StorageError> {
        Ok(self.entries.read().unwrap().len())
    }
}

/// In-memory registry of [`MemoryStore`]s.
#[derive(Default)]
pub struct MemoryStorage {
    stores: RwLock<HashMap<String, Arc<MemoryStore>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStorage for MemoryStorage {
    async fn open(&self, name: &str) -> Result<Arc<dyn CacheStore>, StorageError> {
        let mut stores = self.stores.write().unwrap();
        let store = stores
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(MemoryStore::new()));
        Ok(Arc::clone(store) as Arc<dyn CacheStore>)
    }

    async fn store_names(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.stores.read().unwrap().keys().cloned().collect())
    }

    async fn delete_store(&self, name: &str) -> Result<bool, StorageError> {
        Ok(self.stores.write().unwrap().remove(name).is_some())
    }
}
