//! Mock implementations of core traits for testing.
//!
//! Scripted stand-ins for the host browser runtime, usable across the
//! workspace for unit and integration tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::traits::BrowserRuntime;
use crate::types::{AgentMessage, Envelope, TabHandle};

/// Scripted browser runtime.
///
/// Tabs are declared up front; agent replies are queued and popped per
/// non-ping message. Counters expose how often the coordinator reached for
/// the agent, so tests can assert cache hits never did.
pub struct MockBrowserRuntime {
    tabs: Mutex<Vec<TabHandle>>,
    next_tab_id: AtomicU64,
    agent_alive: AtomicBool,
    fail_injection: bool,
    replies: Mutex<VecDeque<Result<Envelope>>>,
    injections: AtomicUsize,
    agent_calls: AtomicUsize,
    opened: Mutex<Vec<String>>,
    focused: Mutex<Vec<u64>>,
}

impl MockBrowserRuntime {
    pub fn new() -> Self {
        Self {
            tabs: Mutex::new(Vec::new()),
            next_tab_id: AtomicU64::new(1),
            agent_alive: AtomicBool::new(false),
            fail_injection: false,
            replies: Mutex::new(VecDeque::new()),
            injections: AtomicUsize::new(0),
            agent_calls: AtomicUsize::new(0),
            opened: Mutex::new(Vec::new()),
            focused: Mutex::new(Vec::new()),
        }
    }

    /// Declare an open tab at the given URL.
    pub fn with_tab(self, url: &str) -> Self {
        let id = self.next_tab_id.fetch_add(1, Ordering::SeqCst);
        self.tabs.lock().unwrap().push(TabHandle {
            id,
            url: url.to_string(),
        });
        self
    }

    /// Start with the agent already answering pings.
    pub fn with_live_agent(self) -> Self {
        self.agent_alive.store(true, Ordering::SeqCst);
        self
    }

    /// Make injection attempts fail (restricted page).
    pub fn with_failing_injection(mut self) -> Self {
        self.fail_injection = true;
        self
    }

    /// Queue the next agent reply.
    pub fn with_reply(self, reply: Envelope) -> Self {
        self.replies.lock().unwrap().push_back(Ok(reply));
        self
    }

    /// Queue a transport failure for the next agent call.
    pub fn with_send_error(self, err: Error) -> Self {
        self.replies.lock().unwrap().push_back(Err(err));
        self
    }

    /// Number of non-ping messages sent to the agent.
    pub fn agent_calls(&self) -> usize {
        self.agent_calls.load(Ordering::SeqCst)
    }

    /// Number of injection attempts.
    pub fn injections(&self) -> usize {
        self.injections.load(Ordering::SeqCst)
    }

    /// URLs opened in new tabs.
    pub fn opened_urls(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }

    /// Tab ids brought to the foreground.
    pub fn focused_ids(&self) -> Vec<u64> {
        self.focused.lock().unwrap().clone()
    }
}

impl Default for MockBrowserRuntime {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BrowserRuntime for MockBrowserRuntime {
    async fn list_tabs(&self) -> Result<Vec<TabHandle>> {
        Ok(self.tabs.lock().unwrap().clone())
    }

    async fn open_tab(&self, url: &str) -> Result<TabHandle> {
        let id = self.next_tab_id.fetch_add(1, Ordering::SeqCst);
        let tab = TabHandle {
            id,
            url: url.to_string(),
        };
        self.opened.lock().unwrap().push(url.to_string());
        self.tabs.lock().unwrap().push(tab.clone());
        Ok(tab)
    }

    async fn focus_tab(&self, tab: &TabHandle) -> Result<()> {
        self.focused.lock().unwrap().push(tab.id);
        Ok(())
    }

    async fn inject_agent(&self, _tab: &TabHandle) -> Result<()> {
        if self.fail_injection {
            return Err(Error::injection("page does not allow script injection"));
        }
        self.injections.fetch_add(1, Ordering::SeqCst);
        self.agent_alive.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn send_message(&self, _tab: &TabHandle, message: AgentMessage) -> Result<Envelope> {
        if message == AgentMessage::Ping {
            return if self.agent_alive.load(Ordering::SeqCst) {
                Ok(Envelope::pong())
            } else {
                Err(Error::communication("receiving end does not exist"))
            };
        }

        self.agent_calls.fetch_add(1, Ordering::SeqCst);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(Error::communication("no scripted reply queued")))
    }
}
