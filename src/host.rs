//! Host lifecycle signals and the outbound control interface.
//!
//! The host dispatches one lifecycle event at a time and awaits the handler's
//! returned future in full before considering the event handled, so every
//! asynchronous step inside a handler is covered by the event's lifetime.

use crate::types::Request;
use async_trait::async_trait;

/// A lifecycle signal dispatched by the host runtime.
#[derive(Debug, Clone)]
pub enum LifecycleEvent {
    /// A new agent version was loaded for the first time.
    Install,
    /// This version became the active one.
    Activate,
    /// A controlled page issued a network request.
    Fetch(Request),
}

/// Control signals the agent sends back to the host.
#[async_trait]
pub trait HostControl: Send + Sync {
    /// Promote this agent version out of the waiting state immediately,
    /// without waiting for previously-controlled pages to release.
    async fn skip_waiting(&self) -> crate::Result<()>;

    /// Begin controlling all currently open pages, not just future
    /// navigations.
    async fn claim_clients(&self) -> crate::Result<()>;
}

/// No-op control for hosts without a control channel.
pub struct NullControl;

#[async_trait]
impl HostControl for NullControl {
    async fn skip_waiting(&self) -> crate::Result<()> {
        Ok(())
    }

    async fn claim_clients(&self) -> crate::Result<()> {
        Ok(())
    }
}
