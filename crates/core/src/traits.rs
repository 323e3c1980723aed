//! Trait seams between the coordinator and its collaborators.
//!
//! The host browser runtime is a capability the coordinator calls, never
//! something it reimplements; the handoff store is the only durable state.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{AgentMessage, Envelope, TabHandle};

/// Capabilities of the host browser runtime: tab enumeration, script
/// injection, and cross-context messaging.
#[async_trait]
pub trait BrowserRuntime: Send + Sync {
    /// Enumerate open tabs.
    async fn list_tabs(&self) -> Result<Vec<TabHandle>>;

    /// Open a new tab at the given URL.
    async fn open_tab(&self, url: &str) -> Result<TabHandle>;

    /// Bring an existing tab to the foreground.
    async fn focus_tab(&self, tab: &TabHandle) -> Result<()>;

    /// Inject the page-context agent into a tab. Idempotent; re-injection
    /// over a live agent must be tolerated.
    async fn inject_agent(&self, tab: &TabHandle) -> Result<()>;

    /// Send a message to the agent in a tab and wait for its reply.
    async fn send_message(&self, tab: &TabHandle, message: AgentMessage) -> Result<Envelope>;
}

/// Durable single-slot store bridging an out-of-band search trigger to the
/// next UI activation.
#[async_trait]
pub trait HandoffStore: Send + Sync {
    /// Overwrite the slot with a query stamped at the current time.
    async fn write(&self, query: &str) -> Result<()>;

    /// Read the slot without mutating it. A slot older than the staleness
    /// window is treated as absent even if still physically stored.
    async fn read_if_fresh(&self) -> Result<Option<String>>;

    /// Remove the slot. Called by the UI after consuming a fresh value.
    async fn clear(&self) -> Result<()>;
}
