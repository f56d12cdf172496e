//! Core type definitions: intercepted request descriptors and the immutable
//! response values the agent moves between the network and the cache store.

mod request;
mod response;

pub use request::{Method, Request, RequestMode};
pub use response::CachedResponse;
