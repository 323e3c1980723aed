//! Locating the target-site tab and keeping the agent alive in it.

use std::sync::Arc;
use std::time::Duration;

use url::Url;

use moctale_core::config::{AgentConfig, SiteConfig};
use moctale_core::traits::BrowserRuntime;
use moctale_core::types::{AgentMessage, TabHandle};

/// Finds the browser tab hosting the target site and verifies or installs
/// the page-context agent in it.
///
/// The agent only exists transiently inside a live page; every routed call
/// re-verifies or re-establishes its presence.
pub struct AgentLocator {
    runtime: Arc<dyn BrowserRuntime>,
    origins: Vec<String>,
    probe_timeout: Duration,
    settle_delay: Duration,
}

impl AgentLocator {
    pub fn new(runtime: Arc<dyn BrowserRuntime>, site: &SiteConfig, agent: &AgentConfig) -> Self {
        Self {
            runtime,
            origins: site
                .origins
                .iter()
                .map(|o| o.trim_end_matches('/').to_string())
                .collect(),
            probe_timeout: Duration::from_millis(agent.probe_timeout_ms),
            settle_delay: Duration::from_millis(agent.settle_delay_ms),
        }
    }

    fn matches_origin(&self, tab_url: &str) -> bool {
        let origin = match Url::parse(tab_url) {
            Ok(url) => url.origin().ascii_serialization(),
            Err(_) => return false,
        };
        self.origins.iter().any(|known| *known == origin)
    }

    /// First open tab whose origin is in the configured set. No ordering
    /// guarantee beyond the runtime's enumeration order.
    pub async fn locate_tab(&self) -> Option<TabHandle> {
        let tabs = match self.runtime.list_tabs().await {
            Ok(tabs) => tabs,
            Err(e) => {
                tracing::warn!(error = %e, "tab enumeration failed");
                return None;
            }
        };
        tabs.into_iter().find(|tab| self.matches_origin(&tab.url))
    }

    /// Idempotent readiness check: probe the agent, inject on silence, and
    /// wait for it to settle. Returns false only when injection itself fails.
    pub async fn ensure_agent(&self, tab: &TabHandle) -> bool {
        let probe = self.runtime.send_message(tab, AgentMessage::Ping);
        match tokio::time::timeout(self.probe_timeout, probe).await {
            Ok(Ok(reply)) if reply.is_pong() => {
                tracing::trace!(tab_id = tab.id, "agent already present");
                return true;
            }
            Ok(Ok(_)) | Ok(Err(_)) | Err(_) => {
                // Not present, navigated away, or unresponsive: same
                // precondition-not-met outcome, so (re)inject.
            }
        }

        match self.runtime.inject_agent(tab).await {
            Ok(()) => {
                tokio::time::sleep(self.settle_delay).await;
                tracing::debug!(tab_id = tab.id, "agent injected");
                true
            }
            Err(e) => {
                tracing::warn!(tab_id = tab.id, error = %e, "agent injection failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moctale_core::config::AppConfig;
    use moctale_core::mocks::MockBrowserRuntime;

    fn locator(runtime: Arc<MockBrowserRuntime>) -> AgentLocator {
        let cfg = AppConfig::default();
        AgentLocator::new(runtime, &cfg.site, &cfg.agent)
    }

    #[tokio::test(start_paused = true)]
    async fn locates_first_tab_on_a_known_origin() {
        let runtime = Arc::new(
            MockBrowserRuntime::new()
                .with_tab("https://example.com/")
                .with_tab("https://moctale.com/browse?page=2")
                .with_tab("https://www.moctale.com/"),
        );
        let tab = locator(runtime).locate_tab().await.unwrap();
        assert_eq!(tab.url, "https://moctale.com/browse?page=2");
    }

    #[tokio::test(start_paused = true)]
    async fn origin_match_is_exact_not_substring() {
        let runtime = Arc::new(
            MockBrowserRuntime::new()
                .with_tab("https://moctale.com.evil.example/")
                .with_tab("https://notmoctale.com/"),
        );
        assert!(locator(runtime).locate_tab().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn live_agent_is_not_reinjected() {
        let runtime = Arc::new(
            MockBrowserRuntime::new()
                .with_tab("https://moctale.com/")
                .with_live_agent(),
        );
        let locator = locator(runtime.clone());
        let tab = locator.locate_tab().await.unwrap();

        assert!(locator.ensure_agent(&tab).await);
        assert_eq!(runtime.injections(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn silent_agent_triggers_injection() {
        let runtime = Arc::new(MockBrowserRuntime::new().with_tab("https://moctale.com/"));
        let locator = locator(runtime.clone());
        let tab = locator.locate_tab().await.unwrap();

        assert!(locator.ensure_agent(&tab).await);
        assert_eq!(runtime.injections(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn injection_failure_reports_false() {
        let runtime = Arc::new(
            MockBrowserRuntime::new()
                .with_tab("https://moctale.com/")
                .with_failing_injection(),
        );
        let locator = locator(runtime.clone());
        let tab = locator.locate_tab().await.unwrap();

        assert!(!locator.ensure_agent(&tab).await);
    }
}
