//! Browser-runtime implementation hosting agents in simulated tabs.
//!
//! Stands in for a real extension runtime: tabs are records, injection
//! instantiates a [`PageAgent`], and messaging calls it directly. A real
//! embedding would implement [`BrowserRuntime`] against actual browser
//! capabilities instead.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use moctale_core::error::{Error, Result};
use moctale_core::traits::BrowserRuntime;
use moctale_core::types::{AgentMessage, Envelope, TabHandle};

use crate::agent::PageAgent;
use crate::upstream::UpstreamApi;

pub struct HostedRuntime {
    upstream: Arc<dyn UpstreamApi>,
    tabs: DashMap<u64, TabHandle>,
    agents: DashMap<u64, Arc<PageAgent>>,
    next_id: AtomicU64,
}

impl HostedRuntime {
    pub fn new(upstream: Arc<dyn UpstreamApi>) -> Self {
        Self {
            upstream,
            tabs: DashMap::new(),
            agents: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }
}

#[async_trait]
impl BrowserRuntime for HostedRuntime {
    async fn list_tabs(&self) -> Result<Vec<TabHandle>> {
        let mut tabs: Vec<TabHandle> = self.tabs.iter().map(|t| t.value().clone()).collect();
        tabs.sort_by_key(|t| t.id);
        Ok(tabs)
    }

    async fn open_tab(&self, url: &str) -> Result<TabHandle> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let tab = TabHandle {
            id,
            url: url.to_string(),
        };
        self.tabs.insert(id, tab.clone());
        tracing::debug!(tab_id = id, url = %url, "tab opened");
        Ok(tab)
    }

    async fn focus_tab(&self, tab: &TabHandle) -> Result<()> {
        if !self.tabs.contains_key(&tab.id) {
            return Err(Error::communication(format!("no tab with id {}", tab.id)));
        }
        tracing::debug!(tab_id = tab.id, "tab focused");
        Ok(())
    }

    async fn inject_agent(&self, tab: &TabHandle) -> Result<()> {
        if !self.tabs.contains_key(&tab.id) {
            return Err(Error::injection(format!("no tab with id {}", tab.id)));
        }
        // Re-injection over a live agent simply replaces it.
        self.agents
            .insert(tab.id, Arc::new(PageAgent::new(self.upstream.clone())));
        tracing::debug!(tab_id = tab.id, "agent installed");
        Ok(())
    }

    async fn send_message(&self, tab: &TabHandle, message: AgentMessage) -> Result<Envelope> {
        let agent = self
            .agents
            .get(&tab.id)
            .map(|a| a.value().clone())
            .ok_or_else(|| Error::communication("receiving end does not exist"))?;
        Ok(agent.handle(message).await)
    }
}
